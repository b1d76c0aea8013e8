//! Schema DDL. Every statement is idempotent so this runs on each startup.

use crate::error::AppError;
use sqlx::SqlitePool;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS shelters (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        city TEXT NOT NULL,
        foster_program INTEGER NOT NULL DEFAULT 0,
        rank REAL NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pets (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        age INTEGER NOT NULL,
        breed TEXT NOT NULL,
        adoptable INTEGER NOT NULL DEFAULT 1,
        shelter_id INTEGER NOT NULL REFERENCES shelters(id),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS applications (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        address TEXT NOT NULL,
        city TEXT NOT NULL,
        state TEXT NOT NULL,
        zip TEXT NOT NULL,
        description TEXT NOT NULL,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS pet_applications (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        application_id INTEGER NOT NULL REFERENCES applications(id),
        pet_id INTEGER NOT NULL REFERENCES pets(id),
        approval TEXT,
        created_at TEXT NOT NULL,
        UNIQUE (application_id, pet_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_pets_shelter_id ON pets (shelter_id)",
    "CREATE INDEX IF NOT EXISTS idx_pet_applications_pet_id ON pet_applications (pet_id)",
];

/// Create all tables and indexes that do not exist yet.
pub async fn apply_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    for ddl in STATEMENTS {
        sqlx::query(ddl).execute(pool).await?;
    }
    tracing::debug!(statements = STATEMENTS.len(), "schema up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::connect_in_memory;

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let pool = connect_in_memory().await.unwrap();
        apply_migrations(&pool).await.unwrap();
        apply_migrations(&pool).await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(
            tables,
            vec!["applications", "pet_applications", "pets", "shelters"]
        );
    }

    #[tokio::test]
    async fn pets_require_an_existing_shelter() {
        let pool = connect_in_memory().await.unwrap();
        apply_migrations(&pool).await.unwrap();

        let result = sqlx::query(
            "INSERT INTO pets (name, age, breed, adoptable, shelter_id, created_at, updated_at)
             VALUES ('Ghost', 1, 'tabby', 1, 999, '', '')",
        )
        .execute(&pool)
        .await;
        assert!(result.is_err());
    }
}
