//! Pet records: index/search, show, create, update (with the approval compatibility branch), delete.

use crate::error::AppError;
use crate::model::{Approval, NewPet, Pet, PetChanges, PetParams};
use crate::service::applications::ApplicationService;
use crate::service::name_matches;
use crate::service::shelters::ShelterService;
use crate::service::validation::FieldErrors;
use crate::sql::{bind_params, update_by_id, SqlValue};
use chrono::Utc;
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::{debug, info};

pub struct PetService;

/// What `PATCH /pets/:id` did.
#[derive(Debug)]
pub enum PetUpdate {
    /// Ordinary field edit.
    Edited(Pet),
    /// Approval decision sent from the admin application page.
    Decided {
        pet: Pet,
        approval: Approval,
        app_id: Option<i64>,
    },
}

impl PetService {
    /// Pets matching `search` by name when it is non-blank, otherwise every adoptable pet.
    pub async fn index(pool: &SqlitePool, search: Option<&str>) -> Result<Vec<Pet>, AppError> {
        match search.filter(|t| !t.trim().is_empty()) {
            Some(term) => Self::search(pool, term).await,
            None => Self::adoptable(pool).await,
        }
    }

    pub async fn adoptable(pool: &SqlitePool) -> Result<Vec<Pet>, AppError> {
        Ok(sqlx::query_as::<_, Pet>("SELECT * FROM pets WHERE adoptable = 1 ORDER BY id")
            .fetch_all(pool)
            .await?)
    }

    /// Case-insensitive partial match on name across all pets.
    pub async fn search(pool: &SqlitePool, term: &str) -> Result<Vec<Pet>, AppError> {
        debug!(term, "pet search");
        let pets = sqlx::query_as::<_, Pet>("SELECT * FROM pets ORDER BY id")
            .fetch_all(pool)
            .await?;
        Ok(pets.into_iter().filter(|p| name_matches(&p.name, term)).collect())
    }

    pub async fn find(pool: &SqlitePool, id: i64) -> Result<Pet, AppError> {
        sqlx::query_as::<_, Pet>("SELECT * FROM pets WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::not_found("pet", id))
    }

    pub async fn create(pool: &SqlitePool, params: &PetParams) -> Result<Pet, AppError> {
        let new = validate_new(pool, params).await?;
        let now = Utc::now();
        let id = sqlx::query(
            r#"
            INSERT INTO pets (name, age, breed, adoptable, shelter_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.name)
        .bind(new.age)
        .bind(&new.breed)
        .bind(new.adoptable)
        .bind(new.shelter_id)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?
        .last_insert_rowid();
        info!(pet_id = id, shelter_id = new.shelter_id, name = %new.name, "pet created");
        Self::find(pool, id).await
    }

    pub async fn update(pool: &SqlitePool, id: i64, params: &PetParams) -> Result<PetUpdate, AppError> {
        Self::find(pool, id).await?;

        if let Some(approval) = approval_marker(params) {
            let app_id = params.app_id.as_ref().and_then(parse_id_value);
            let pet = match app_id {
                Some(app_id) if ApplicationService::is_linked(pool, app_id, id).await? => {
                    ApplicationService::decide(pool, app_id, id, approval).await?
                }
                _ => Self::set_adoptable(pool, id, approval.adoptable()).await?,
            };
            return Ok(PetUpdate::Decided {
                pet,
                approval,
                app_id,
            });
        }

        let changes = validate_changes(pool, id, params).await?;
        let mut assignments: Vec<(&'static str, SqlValue)> = Vec::new();
        if let Some(name) = changes.name {
            assignments.push(("name", name.into()));
        }
        if let Some(age) = changes.age {
            assignments.push(("age", age.into()));
        }
        if let Some(breed) = changes.breed {
            assignments.push(("breed", breed.into()));
        }
        if let Some(adoptable) = changes.adoptable {
            assignments.push(("adoptable", adoptable.into()));
        }
        if let Some(shelter_id) = changes.shelter_id {
            assignments.push(("shelter_id", shelter_id.into()));
        }
        if !assignments.is_empty() {
            assignments.push(("updated_at", Utc::now().into()));
        }
        if let Some(q) = update_by_id("pets", assignments, id) {
            bind_params(sqlx::query(&q.sql), &q.params).execute(pool).await?;
            info!(pet_id = id, "pet updated");
        }
        Ok(PetUpdate::Edited(Self::find(pool, id).await?))
    }

    pub async fn set_adoptable(pool: &SqlitePool, id: i64, adoptable: bool) -> Result<Pet, AppError> {
        sqlx::query("UPDATE pets SET adoptable = ?, updated_at = ? WHERE id = ?")
            .bind(adoptable)
            .bind(Utc::now())
            .bind(id)
            .execute(pool)
            .await?;
        info!(pet_id = id, adoptable, "pet adoptability changed");
        Self::find(pool, id).await
    }

    /// Removes the pet and its application links.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
        Self::find(pool, id).await?;
        let mut tx = pool.begin().await?;
        sqlx::query("DELETE FROM pet_applications WHERE pet_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM pets WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        info!(pet_id = id, "pet deleted");
        Ok(())
    }
}

/// Legacy admin form: `approve` exactly `"true"` with a name containing "Approved" approves,
/// exactly `"false"` with a name containing "Rejected" rejects. Anything else is a normal edit.
fn approval_marker(params: &PetParams) -> Option<Approval> {
    let approve = params.approve.as_ref().and_then(Value::as_str)?;
    let name = params.name.as_ref().and_then(Value::as_str)?;
    match approve {
        "true" if name.contains("Approved") => Some(Approval::Approved),
        "false" if name.contains("Rejected") => Some(Approval::Rejected),
        _ => None,
    }
}

/// Integer id from a JSON number or numeric string.
pub(crate) fn parse_id_value(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

async fn validate_shelter(
    pool: &SqlitePool,
    errors: &mut FieldErrors,
    value: Option<&Value>,
) -> Result<Option<i64>, AppError> {
    let Some(raw) = value.filter(|v| !v.is_null()) else {
        errors.add("shelter_id", "must exist");
        return Ok(None);
    };
    match parse_id_value(raw) {
        Some(id) if ShelterService::exists(pool, id).await? => Ok(Some(id)),
        _ => {
            errors.add("shelter_id", "must exist");
            Ok(None)
        }
    }
}

fn check_age(errors: &mut FieldErrors, age: Option<i64>) -> Option<i64> {
    match age {
        Some(a) if a < 0 => {
            errors.add("age", "must be greater than or equal to 0");
            None
        }
        other => other,
    }
}

async fn validate_new(pool: &SqlitePool, params: &PetParams) -> Result<NewPet, AppError> {
    let mut errors = FieldErrors::new();
    let name = errors.text("name", params.name.as_ref());
    let age = errors.integer("age", params.age.as_ref());
    let age = check_age(&mut errors, age);
    let breed = errors.text("breed", params.breed.as_ref());
    let adoptable = errors
        .boolean_if_present("adoptable", params.adoptable.as_ref())
        .unwrap_or(true);
    let shelter_id = validate_shelter(pool, &mut errors, params.shelter_id.as_ref()).await?;

    let redirect = match params.shelter_id.as_ref().and_then(parse_id_value) {
        Some(sid) => format!("/shelters/{sid}/pets/new"),
        None => "/pets".to_string(),
    };
    match (name, age, breed, shelter_id) {
        (Some(name), Some(age), Some(breed), Some(shelter_id)) if errors.is_empty() => Ok(NewPet {
            name,
            age,
            breed,
            adoptable,
            shelter_id,
        }),
        _ => Err(errors.into_error(redirect)),
    }
}

async fn validate_changes(pool: &SqlitePool, id: i64, params: &PetParams) -> Result<PetChanges, AppError> {
    let mut errors = FieldErrors::new();
    let age = match params.age.as_ref() {
        Some(v) => errors.integer("age", Some(v)),
        None => None,
    };
    let shelter_id = match params.shelter_id.as_ref() {
        Some(v) => validate_shelter(pool, &mut errors, Some(v)).await?,
        None => None,
    };
    let changes = PetChanges {
        name: errors.text_if_present("name", params.name.as_ref()),
        age: check_age(&mut errors, age),
        breed: errors.text_if_present("breed", params.breed.as_ref()),
        adoptable: errors.boolean_if_present("adoptable", params.adoptable.as_ref()),
        shelter_id,
    };
    errors.into_result(format!("/pets/{id}/edit"))?;
    Ok(changes)
}
