//! Pet adoption service: shelters, their pets, and adoption applications over a JSON API.

pub mod config;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

#[cfg(test)]
mod test_support;

pub use config::AppConfig;
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use routes::app_routes;
pub use state::AppState;
pub use store::{connect, connect_in_memory};
