//! Shelter CRUD and the shelter-level query helpers (search, orderings, pet views).

use crate::error::AppError;
use crate::model::{
    ApplicationStatus, NewShelter, Pet, Shelter, ShelterChanges, ShelterDetail, ShelterParams, ShelterSort,
};
use crate::service::name_matches;
use crate::service::validation::FieldErrors;
use crate::sql::{bind_params, update_by_id, SqlValue};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

pub struct ShelterService;

impl ShelterService {
    pub async fn find(pool: &SqlitePool, id: i64) -> Result<Shelter, AppError> {
        sqlx::query_as::<_, Shelter>("SELECT * FROM shelters WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::not_found("shelter", id))
    }

    pub async fn exists(pool: &SqlitePool, id: i64) -> Result<bool, AppError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM shelters WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(found.is_some())
    }

    /// Shelter with its pet count.
    pub async fn detail(pool: &SqlitePool, id: i64) -> Result<ShelterDetail, AppError> {
        let shelter = Self::find(pool, id).await?;
        let pet_count = Self::pet_count(pool, id).await?;
        Ok(ShelterDetail { shelter, pet_count })
    }

    /// Index view: a non-blank search term wins over the sort selector.
    pub async fn list(
        pool: &SqlitePool,
        search: Option<&str>,
        sort: ShelterSort,
    ) -> Result<Vec<Shelter>, AppError> {
        if let Some(term) = search.filter(|t| !t.trim().is_empty()) {
            return Self::search(pool, term).await;
        }
        match sort {
            ShelterSort::Id => Self::all(pool).await,
            ShelterSort::Recent => Self::order_by_recently_created(pool).await,
            ShelterSort::PetCount => Self::order_by_number_of_pets(pool).await,
            ShelterSort::NameDesc => Self::reverse_ordered(pool).await,
        }
    }

    pub async fn all(pool: &SqlitePool) -> Result<Vec<Shelter>, AppError> {
        Ok(sqlx::query_as::<_, Shelter>("SELECT * FROM shelters ORDER BY id")
            .fetch_all(pool)
            .await?)
    }

    /// Case-insensitive partial match on name, in id order.
    pub async fn search(pool: &SqlitePool, term: &str) -> Result<Vec<Shelter>, AppError> {
        debug!(term, "shelter search");
        let shelters = Self::all(pool).await?;
        Ok(shelters.into_iter().filter(|s| name_matches(&s.name, term)).collect())
    }

    pub async fn order_by_recently_created(pool: &SqlitePool) -> Result<Vec<Shelter>, AppError> {
        Ok(sqlx::query_as::<_, Shelter>(
            "SELECT * FROM shelters ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(pool)
        .await?)
    }

    /// Most pets first; equal counts keep id order.
    pub async fn order_by_number_of_pets(pool: &SqlitePool) -> Result<Vec<Shelter>, AppError> {
        Ok(sqlx::query_as::<_, Shelter>(
            r#"
            SELECT shelters.* FROM shelters
            LEFT JOIN pets ON pets.shelter_id = shelters.id
            GROUP BY shelters.id
            ORDER BY COUNT(pets.id) DESC, shelters.id ASC
            "#,
        )
        .fetch_all(pool)
        .await?)
    }

    pub async fn reverse_ordered(pool: &SqlitePool) -> Result<Vec<Shelter>, AppError> {
        Ok(sqlx::query_as::<_, Shelter>("SELECT * FROM shelters ORDER BY name DESC, id")
            .fetch_all(pool)
            .await?)
    }

    /// Distinct shelters owning a pet on at least one application whose status is exactly "Pending".
    pub async fn pending_applications(pool: &SqlitePool) -> Result<Vec<Shelter>, AppError> {
        Ok(sqlx::query_as::<_, Shelter>(
            r#"
            SELECT DISTINCT shelters.* FROM shelters
            JOIN pets ON pets.shelter_id = shelters.id
            JOIN pet_applications ON pet_applications.pet_id = pets.id
            JOIN applications ON applications.id = pet_applications.application_id
            WHERE applications.status = ?
            ORDER BY shelters.id
            "#,
        )
        .bind(ApplicationStatus::Pending.as_str())
        .fetch_all(pool)
        .await?)
    }

    /// Adoptable pets of the shelter, in load order.
    pub async fn adoptable_pets(pool: &SqlitePool, shelter_id: i64) -> Result<Vec<Pet>, AppError> {
        Ok(sqlx::query_as::<_, Pet>(
            "SELECT * FROM pets WHERE shelter_id = ? AND adoptable = 1 ORDER BY id",
        )
        .bind(shelter_id)
        .fetch_all(pool)
        .await?)
    }

    /// Adoptable pets of the shelter sorted by name.
    pub async fn alphabetical_pets(pool: &SqlitePool, shelter_id: i64) -> Result<Vec<Pet>, AppError> {
        Ok(sqlx::query_as::<_, Pet>(
            "SELECT * FROM pets WHERE shelter_id = ? AND adoptable = 1 ORDER BY name COLLATE NOCASE, id",
        )
        .bind(shelter_id)
        .fetch_all(pool)
        .await?)
    }

    /// Adoptable pets of the shelter aged at least `min_age`.
    pub async fn shelter_pets_filtered_by_age(
        pool: &SqlitePool,
        shelter_id: i64,
        min_age: i64,
    ) -> Result<Vec<Pet>, AppError> {
        let pets = Self::adoptable_pets(pool, shelter_id).await?;
        Ok(pets.into_iter().filter(|p| p.age >= min_age).collect())
    }

    pub async fn pet_count(pool: &SqlitePool, shelter_id: i64) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar("SELECT COUNT(*) FROM pets WHERE shelter_id = ?")
            .bind(shelter_id)
            .fetch_one(pool)
            .await?)
    }

    pub async fn create(pool: &SqlitePool, params: &ShelterParams) -> Result<Shelter, AppError> {
        let new = validate_new(params)?;
        let now = Utc::now();
        let id = sqlx::query(
            r#"
            INSERT INTO shelters (name, city, foster_program, rank, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.name)
        .bind(&new.city)
        .bind(new.foster_program)
        .bind(new.rank)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?
        .last_insert_rowid();
        info!(shelter_id = id, name = %new.name, "shelter created");
        Self::find(pool, id).await
    }

    pub async fn update(pool: &SqlitePool, id: i64, params: &ShelterParams) -> Result<Shelter, AppError> {
        Self::find(pool, id).await?;
        let changes = validate_changes(params, id)?;

        let mut assignments: Vec<(&'static str, SqlValue)> = Vec::new();
        if let Some(name) = changes.name {
            assignments.push(("name", name.into()));
        }
        if let Some(city) = changes.city {
            assignments.push(("city", city.into()));
        }
        if let Some(foster) = changes.foster_program {
            assignments.push(("foster_program", foster.into()));
        }
        if let Some(rank) = changes.rank {
            assignments.push(("rank", rank.into()));
        }
        if !assignments.is_empty() {
            assignments.push(("updated_at", Utc::now().into()));
        }
        if let Some(q) = update_by_id("shelters", assignments, id) {
            bind_params(sqlx::query(&q.sql), &q.params).execute(pool).await?;
            info!(shelter_id = id, "shelter updated");
        }
        Self::find(pool, id).await
    }

    /// Removes the shelter together with its pets and their application links.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<(), AppError> {
        Self::find(pool, id).await?;
        let mut tx = pool.begin().await?;
        sqlx::query(
            "DELETE FROM pet_applications WHERE pet_id IN (SELECT id FROM pets WHERE shelter_id = ?)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        let pets = sqlx::query("DELETE FROM pets WHERE shelter_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        sqlx::query("DELETE FROM shelters WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        info!(shelter_id = id, pets_removed = pets, "shelter deleted");
        Ok(())
    }
}

fn validate_new(params: &ShelterParams) -> Result<NewShelter, AppError> {
    let mut errors = FieldErrors::new();
    let name = errors.text("name", params.name.as_ref());
    let city = errors.text("city", params.city.as_ref());
    let foster_program = errors
        .boolean_if_present("foster_program", params.foster_program.as_ref())
        .unwrap_or(false);
    let rank = errors.number("rank", params.rank.as_ref());
    match (name, city, rank) {
        (Some(name), Some(city), Some(rank)) if errors.is_empty() => Ok(NewShelter {
            name,
            city,
            foster_program,
            rank,
        }),
        _ => Err(errors.into_error("/shelters/new")),
    }
}

fn validate_changes(params: &ShelterParams, id: i64) -> Result<ShelterChanges, AppError> {
    let mut errors = FieldErrors::new();
    let changes = ShelterChanges {
        name: errors.text_if_present("name", params.name.as_ref()),
        city: errors.text_if_present("city", params.city.as_ref()),
        foster_program: errors.boolean_if_present("foster_program", params.foster_program.as_ref()),
        rank: match params.rank.as_ref() {
            Some(v) => errors.number("rank", Some(v)),
            None => None,
        },
    };
    errors.into_result(format!("/shelters/{id}/edit"))?;
    Ok(changes)
}
