//! Shelter handlers, including the per-shelter pet listing.

use super::{body_params, parse_id, query_params};
use crate::error::AppError;
use crate::model::{ShelterIndexQuery, ShelterParams, ShelterPetSort, ShelterPetsQuery};
use crate::response::{created, success_many, success_one_ok, updated};
use crate::service::ShelterService;
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
    query: Result<Query<ShelterIndexQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let query = query_params(query)?;
    let shelters = ShelterService::list(
        &state.pool,
        query.search.as_deref(),
        query.sort.unwrap_or_default(),
    )
    .await?;
    Ok(success_many(shelters))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id("shelter", &id)?;
    Ok(success_one_ok(ShelterService::detail(&state.pool, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let params: ShelterParams = body_params(payload)?;
    let shelter = ShelterService::create(&state.pool, &params).await?;
    let redirect = format!("/shelters/{}", shelter.id);
    Ok(created(shelter, redirect))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id("shelter", &id)?;
    let params: ShelterParams = body_params(payload)?;
    let shelter = ShelterService::update(&state.pool, id, &params).await?;
    Ok(updated(shelter, format!("/shelters/{id}")))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id("shelter", &id)?;
    ShelterService::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Adoptable pets of one shelter; `sort=alphabetical` orders by name, `age=n` keeps pets aged n or older.
pub async fn pets(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<ShelterPetsQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id("shelter", &id)?;
    let query = query_params(query)?;
    ShelterService::find(&state.pool, id).await?;
    let pets = match (query.sort, query.age) {
        (None, None) => ShelterService::adoptable_pets(&state.pool, id).await?,
        (None, Some(age)) => ShelterService::shelter_pets_filtered_by_age(&state.pool, id, age).await?,
        (Some(ShelterPetSort::Alphabetical), age) => {
            let mut pets = ShelterService::alphabetical_pets(&state.pool, id).await?;
            if let Some(age) = age {
                pets.retain(|p| p.age >= age);
            }
            pets
        }
    };
    Ok(success_many(pets))
}

/// New pet form context: the shelter the pet will belong to.
pub async fn new_pet(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id("shelter", &id)?;
    Ok(success_one_ok(ShelterService::find(&state.pool, id).await?))
}
