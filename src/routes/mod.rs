//! Router assembly.

mod admin;
mod applications;
mod common;
mod pets;
mod shelters;

pub use admin::admin_routes;
pub use applications::application_routes;
pub use common::common_routes;
pub use pets::pet_routes;
pub use shelters::shelter_routes;

use crate::state::AppState;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Request bodies are small JSON forms.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Every route of the service with request tracing and a body size cap.
pub fn app_routes(state: AppState) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(pet_routes(state.clone()))
        .merge(shelter_routes(state.clone()))
        .merge(application_routes(state.clone()))
        .merge(admin_routes(state))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
}
