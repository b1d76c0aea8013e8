use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct Shelter {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub foster_program: bool,
    pub rank: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Shelter plus its total pet count, for detail views.
#[derive(Clone, Debug, Serialize)]
pub struct ShelterDetail {
    #[serde(flatten)]
    pub shelter: Shelter,
    pub pet_count: i64,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ShelterParams {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub city: Option<Value>,
    #[serde(default)]
    pub foster_program: Option<Value>,
    #[serde(default)]
    pub rank: Option<Value>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewShelter {
    pub name: String,
    pub city: String,
    pub foster_program: bool,
    pub rank: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShelterChanges {
    pub name: Option<String>,
    pub city: Option<String>,
    pub foster_program: Option<bool>,
    pub rank: Option<f64>,
}

/// Ordering for the shelter index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShelterSort {
    /// Insertion (id) order.
    #[default]
    Id,
    /// Newest first.
    Recent,
    /// Most pets first.
    PetCount,
    /// Reverse alphabetical by name.
    NameDesc,
}

#[derive(Debug, Default, Deserialize)]
pub struct ShelterIndexQuery {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub sort: Option<ShelterSort>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShelterPetSort {
    Alphabetical,
}

#[derive(Debug, Default, Deserialize)]
pub struct ShelterPetsQuery {
    #[serde(default)]
    pub sort: Option<ShelterPetSort>,
    /// Minimum age, inclusive.
    #[serde(default)]
    pub age: Option<i64>,
}
