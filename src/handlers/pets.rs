//! Pet handlers: index, show, edit context, create, update, delete.

use super::{body_params, parse_id, query_params};
use crate::error::AppError;
use crate::model::{PetIndexQuery, PetParams};
use crate::response::{created, success_many, success_one_ok, updated};
use crate::service::{PetService, PetUpdate};
use crate::state::AppState;
use axum::{
    extract::{rejection::{JsonRejection, QueryRejection}, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;

pub async fn index(
    State(state): State<AppState>,
    query: Result<Query<PetIndexQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let query = query_params(query)?;
    let pets = PetService::index(&state.pool, query.search.as_deref()).await?;
    Ok(success_many(pets))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id("pet", &id)?;
    Ok(success_one_ok(PetService::find(&state.pool, id).await?))
}

/// Edit form context: the current pet.
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id("pet", &id)?;
    Ok(success_one_ok(PetService::find(&state.pool, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let params: PetParams = body_params(payload)?;
    let pet = PetService::create(&state.pool, &params).await?;
    let redirect = format!("/shelters/{}/pets", pet.shelter_id);
    Ok(created(pet, redirect))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id("pet", &id)?;
    let params: PetParams = body_params(payload)?;
    let response = match PetService::update(&state.pool, id, &params).await? {
        PetUpdate::Edited(pet) => updated(pet, format!("/pets/{id}")),
        PetUpdate::Decided { pet, app_id, .. } => {
            let redirect = match app_id {
                Some(app_id) => format!("/admin/applications/{app_id}"),
                None => format!("/pets/{id}"),
            };
            updated(pet, redirect)
        }
    };
    Ok(response)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id("pet", &id)?;
    PetService::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
