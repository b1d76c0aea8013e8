use crate::handlers::applications::{add_pet, create, show};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn application_routes(state: AppState) -> Router {
    Router::new()
        .route("/applications", post(create))
        .route("/applications/:id", get(show))
        .route("/applications/:id/pets", post(add_pet))
        .with_state(state)
}
