use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Pet;

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct Application {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub description: String,
    /// Free text; see [`ApplicationStatus`] for the values the workflow writes.
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Status values the approval workflow reads or writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "Pending",
            ApplicationStatus::Accepted => "Accepted",
            ApplicationStatus::Rejected => "Rejected",
        }
    }
}

/// Per-pet decision recorded on the join row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Approval {
    Approved,
    Rejected,
}

impl Approval {
    pub fn from_approve(approve: bool) -> Self {
        if approve {
            Approval::Approved
        } else {
            Approval::Rejected
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Approval::Approved => "Approved",
            Approval::Rejected => "Rejected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Approved" => Some(Approval::Approved),
            "Rejected" => Some(Approval::Rejected),
            _ => None,
        }
    }

    /// Approved pets leave the adoptable pool; rejected pets return to it.
    pub fn adoptable(&self) -> bool {
        matches!(self, Approval::Rejected)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct PetApplication {
    pub id: i64,
    pub application_id: i64,
    pub pet_id: i64,
    pub approval: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /applications`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ApplicationParams {
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub address: Option<Value>,
    #[serde(default)]
    pub city: Option<Value>,
    #[serde(default)]
    pub state: Option<Value>,
    #[serde(default)]
    pub zip: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub status: Option<Value>,
    /// Pet ids to link on submission, as a JSON array of ids.
    #[serde(default)]
    pub pet_ids: Option<Value>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewApplication {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub description: String,
    pub status: String,
    pub pet_ids: Vec<i64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AddPetParams {
    pub pet_id: Value,
}

#[derive(Clone, Debug, Deserialize)]
pub struct StatusParams {
    #[serde(default)]
    pub status: Option<Value>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DecisionParams {
    #[serde(default)]
    pub approve: Option<Value>,
}

/// A pet as it appears on an application, with the admin decision if any.
#[derive(Clone, Debug, Serialize)]
pub struct ApplicationPet {
    #[serde(flatten)]
    pub pet: Pet,
    pub approval: Option<Approval>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ApplicationDetail {
    #[serde(flatten)]
    pub application: Application,
    pub pets: Vec<ApplicationPet>,
}
