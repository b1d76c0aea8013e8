//! Domain services. Each is a unit struct of associated fns over a `SqlitePool`.

mod applications;
mod pets;
mod shelters;
pub mod validation;

pub use applications::{ApplicationService, INCOMPLETE_APPLICATION};
pub use pets::{PetService, PetUpdate};
pub use shelters::ShelterService;

pub(crate) use pets::parse_id_value;

/// Unicode case-insensitive substring match of a trimmed search term against a name.
/// SQLite's `LOWER` and `LIKE` only fold ASCII, so name search is filtered here.
pub(crate) fn name_matches(name: &str, term: &str) -> bool {
    name.to_lowercase().contains(&term.trim().to_lowercase())
}
