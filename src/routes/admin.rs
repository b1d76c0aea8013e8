//! Admin routes. No authentication; deploy behind an operator-only network.

use crate::handlers::admin::{decide_pet, show_application, shelters, update_application};
use crate::state::AppState;
use axum::{
    routing::{get, patch},
    Router,
};

pub fn admin_routes(state: AppState) -> Router {
    Router::new()
        .route("/admin/shelters", get(shelters))
        .route(
            "/admin/applications/:id",
            get(show_application).patch(update_application),
        )
        .route("/admin/applications/:id/pets/:pet_id", patch(decide_pet))
        .with_state(state)
}
