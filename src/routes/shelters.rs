use crate::handlers::shelters::{create, delete, index, new_pet, pets, show, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn shelter_routes(state: AppState) -> Router {
    Router::new()
        .route("/shelters", get(index).post(create))
        .route("/shelters/:id", get(show).patch(update).delete(delete))
        .route("/shelters/:id/pets", get(pets))
        .route("/shelters/:id/pets/new", get(new_pet))
        .with_state(state)
}
