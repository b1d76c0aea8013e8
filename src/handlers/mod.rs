//! HTTP handlers: extract, delegate to a service, wrap in the response envelope.

pub mod admin;
pub mod applications;
pub mod pets;
pub mod shelters;

use crate::error::AppError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Path ids that are not integers cannot name a row.
fn parse_id(kind: &str, raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::NotFound(format!("{kind} {raw}")))
}

/// Request body as typed params. Fields are loosely typed and coerced by the services,
/// so only a malformed body or a non-object is rejected here.
fn body_params<T: DeserializeOwned>(payload: Result<Json<Value>, JsonRejection>) -> Result<T, AppError> {
    let Json(body) = payload?;
    if !body.is_object() {
        return Err(AppError::BadRequest("body must be a JSON object".into()));
    }
    serde_json::from_value(body).map_err(|e| AppError::BadRequest(e.to_string()))
}

fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    let Query(params) = query?;
    Ok(params)
}
