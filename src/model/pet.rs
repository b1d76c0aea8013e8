use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct Pet {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub breed: String,
    pub adoptable: bool,
    pub shelter_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /pets` and `PATCH /pets/:id`. Numeric and boolean fields arrive loosely typed
/// so form-encoded clients can send strings.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PetParams {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub age: Option<Value>,
    #[serde(default)]
    pub breed: Option<Value>,
    #[serde(default)]
    pub adoptable: Option<Value>,
    #[serde(default)]
    pub shelter_id: Option<Value>,
    /// Approval flag sent by the admin application page ("true"/"false").
    #[serde(default)]
    pub approve: Option<Value>,
    #[serde(default)]
    pub app_id: Option<Value>,
}

/// Validated input for a new pet.
#[derive(Clone, Debug, PartialEq)]
pub struct NewPet {
    pub name: String,
    pub age: i64,
    pub breed: String,
    pub adoptable: bool,
    pub shelter_id: i64,
}

/// Validated partial update; `None` leaves the column untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PetChanges {
    pub name: Option<String>,
    pub age: Option<i64>,
    pub breed: Option<String>,
    pub adoptable: Option<bool>,
    pub shelter_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PetIndexQuery {
    #[serde(default)]
    pub search: Option<String>,
}
