//! Fixtures for unit tests: a migrated in-memory database and row seeders.

use crate::migration::apply_migrations;
use crate::model::{Application, Pet, Shelter};
use crate::store::connect_in_memory;
use chrono::Utc;
use sqlx::SqlitePool;

pub async fn test_pool() -> SqlitePool {
    let pool = connect_in_memory().await.expect("in-memory pool");
    apply_migrations(&pool).await.expect("migrations");
    pool
}

pub async fn seed_shelter(pool: &SqlitePool, name: &str, city: &str, foster: bool, rank: f64) -> Shelter {
    let now = Utc::now();
    sqlx::query_as::<_, Shelter>(
        "INSERT INTO shelters (name, city, foster_program, rank, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(name)
    .bind(city)
    .bind(foster)
    .bind(rank)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .expect("seed shelter")
}

pub async fn seed_pet(
    pool: &SqlitePool,
    shelter_id: i64,
    name: &str,
    breed: &str,
    age: i64,
    adoptable: bool,
) -> Pet {
    let now = Utc::now();
    sqlx::query_as::<_, Pet>(
        "INSERT INTO pets (name, age, breed, adoptable, shelter_id, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING *",
    )
    .bind(name)
    .bind(age)
    .bind(breed)
    .bind(adoptable)
    .bind(shelter_id)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .expect("seed pet")
}

pub async fn seed_application(pool: &SqlitePool, name: &str, status: &str) -> Application {
    let now = Utc::now();
    sqlx::query_as::<_, Application>(
        "INSERT INTO applications (name, address, city, state, zip, description, status, created_at, updated_at)
         VALUES (?, '123 Main St', 'Denver', 'CO', '80202', 'Big yard', ?, ?, ?) RETURNING *",
    )
    .bind(name)
    .bind(status)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await
    .expect("seed application")
}

pub async fn link(pool: &SqlitePool, app_id: i64, pet_id: i64) {
    sqlx::query("INSERT INTO pet_applications (application_id, pet_id, created_at) VALUES (?, ?, ?)")
        .bind(app_id)
        .bind(pet_id)
        .bind(Utc::now())
        .execute(pool)
        .await
        .expect("link pet");
}
