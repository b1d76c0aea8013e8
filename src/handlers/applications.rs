//! Public application intake.

use super::{body_params, parse_id};
use crate::error::AppError;
use crate::model::{AddPetParams, ApplicationParams};
use crate::response::{created, success_one_ok, updated};
use crate::service::{parse_id_value, ApplicationService};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::Value;

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let params: ApplicationParams = body_params(payload)?;
    let application = ApplicationService::create(&state.pool, &params).await?;
    let redirect = format!("/applications/{}", application.id);
    Ok(created(application, redirect))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id("application", &id)?;
    Ok(success_one_ok(ApplicationService::detail(&state.pool, id).await?))
}

pub async fn add_pet(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id("application", &id)?;
    let params: AddPetParams = body_params(payload)?;
    let pet_id = parse_id_value(&params.pet_id)
        .ok_or_else(|| AppError::NotFound(format!("pet {}", params.pet_id)))?;
    let detail = ApplicationService::add_pet(&state.pool, id, pet_id).await?;
    Ok(updated(detail, format!("/applications/{id}")))
}
