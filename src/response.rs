//! Standard response envelope helpers.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct SuccessOne<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// Where a browser client should go next after a write.
#[derive(Serialize)]
pub struct Meta {
    pub redirect_to: String,
}

#[derive(Serialize)]
pub struct SuccessMany<T> {
    pub data: Vec<T>,
    pub meta: MetaCount,
}

#[derive(Serialize)]
pub struct MetaCount {
    pub count: u64,
}

pub fn success_one_ok<T: Serialize>(data: T) -> (StatusCode, Json<SuccessOne<T>>) {
    (StatusCode::OK, Json(SuccessOne { data, meta: None }))
}

/// 201 with the created record and its follow-up location.
pub fn created<T: Serialize>(data: T, redirect_to: impl Into<String>) -> (StatusCode, Json<SuccessOne<T>>) {
    with_redirect(StatusCode::CREATED, data, redirect_to)
}

pub fn updated<T: Serialize>(data: T, redirect_to: impl Into<String>) -> (StatusCode, Json<SuccessOne<T>>) {
    with_redirect(StatusCode::OK, data, redirect_to)
}

fn with_redirect<T: Serialize>(
    status: StatusCode,
    data: T,
    redirect_to: impl Into<String>,
) -> (StatusCode, Json<SuccessOne<T>>) {
    (
        status,
        Json(SuccessOne {
            data,
            meta: Some(Meta {
                redirect_to: redirect_to.into(),
            }),
        }),
    )
}

pub fn success_many<T: Serialize>(data: Vec<T>) -> (StatusCode, Json<SuccessMany<T>>) {
    let count = data.len() as u64;
    (
        StatusCode::OK,
        Json(SuccessMany {
            data,
            meta: MetaCount { count },
        }),
    )
}
