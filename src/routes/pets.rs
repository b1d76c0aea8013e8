use crate::handlers::pets::{create, delete, edit, index, show, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn pet_routes(state: AppState) -> Router {
    Router::new()
        .route("/pets", get(index).post(create))
        .route("/pets/:id", get(show).patch(update).delete(delete))
        .route("/pets/:id/edit", get(edit))
        .with_state(state)
}
