//! Admin views: shelter overview, application review, per-pet decisions.

use super::{body_params, parse_id};
use crate::error::AppError;
use crate::model::{Approval, DecisionParams, Shelter, StatusParams};
use crate::response::{success_one_ok, updated};
use crate::service::validation::FieldErrors;
use crate::service::{ApplicationService, ShelterService};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
pub struct AdminShelters {
    pub shelters: Vec<Shelter>,
    pub pending_applications: Vec<Shelter>,
}

pub async fn shelters(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let shelters = ShelterService::reverse_ordered(&state.pool).await?;
    let pending_applications = ShelterService::pending_applications(&state.pool).await?;
    Ok(success_one_ok(AdminShelters {
        shelters,
        pending_applications,
    }))
}

pub async fn show_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id("application", &id)?;
    Ok(success_one_ok(ApplicationService::detail(&state.pool, id).await?))
}

pub async fn update_application(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id("application", &id)?;
    let params: StatusParams = body_params(payload)?;
    let application = ApplicationService::update_status(&state.pool, id, params.status.as_ref()).await?;
    Ok(updated(application, format!("/admin/applications/{id}")))
}

pub async fn decide_pet(
    State(state): State<AppState>,
    Path((id, pet_id)): Path<(String, String)>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let app_id = parse_id("application", &id)?;
    let pet_id = parse_id("pet", &pet_id)?;
    let params: DecisionParams = body_params(payload)?;
    let redirect = format!("/admin/applications/{app_id}");

    let mut errors = FieldErrors::new();
    let approve = match params.approve.as_ref().filter(|v| !v.is_null()) {
        Some(value) => errors.boolean_if_present("approve", Some(value)),
        None => {
            errors.add("approve", "can't be blank");
            None
        }
    };
    let Some(approve) = approve else {
        return Err(errors.into_error(redirect));
    };
    let pet = ApplicationService::decide(&state.pool, app_id, pet_id, Approval::from_approve(approve)).await?;
    Ok(updated(pet, redirect))
}
