//! Application intake, pet links, and the admin approval workflow.

use crate::error::AppError;
use crate::model::{
    Application, ApplicationDetail, ApplicationParams, ApplicationPet, ApplicationStatus, Approval,
    NewApplication, Pet, PetApplication,
};
use crate::service::parse_id_value;
use crate::service::validation::FieldErrors;
use chrono::Utc;
use serde_json::Value;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::info;

/// Shown for any missing application field.
pub const INCOMPLETE_APPLICATION: &str = "Each field must be complete";

pub struct ApplicationService;

impl ApplicationService {
    pub async fn find(pool: &SqlitePool, id: i64) -> Result<Application, AppError> {
        sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::not_found("application", id))
    }

    /// Application with its linked pets and each pet's decision.
    pub async fn detail(pool: &SqlitePool, id: i64) -> Result<ApplicationDetail, AppError> {
        let application = Self::find(pool, id).await?;
        let links = sqlx::query_as::<_, PetApplication>(
            "SELECT * FROM pet_applications WHERE application_id = ? ORDER BY id",
        )
        .bind(id)
        .fetch_all(pool)
        .await?;

        let mut pets = Vec::with_capacity(links.len());
        for link in links {
            let pet = sqlx::query_as::<_, Pet>("SELECT * FROM pets WHERE id = ?")
                .bind(link.pet_id)
                .fetch_one(pool)
                .await?;
            pets.push(ApplicationPet {
                pet,
                approval: link.approval.as_deref().and_then(Approval::parse),
            });
        }
        Ok(ApplicationDetail { application, pets })
    }

    /// All-or-nothing intake: any blank field rejects the whole submission.
    pub async fn create(pool: &SqlitePool, params: &ApplicationParams) -> Result<Application, AppError> {
        let new = validate_new(params)?;

        for pet_id in &new.pet_ids {
            let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM pets WHERE id = ?")
                .bind(pet_id)
                .fetch_optional(pool)
                .await?;
            if exists.is_none() {
                let mut errors = FieldErrors::new();
                errors.add("pet_ids", &format!("references missing pet {pet_id}"));
                return Err(errors.into_error("/applications/new"));
            }
        }

        let now = Utc::now();
        let mut tx = pool.begin().await?;
        let id = sqlx::query(
            r#"
            INSERT INTO applications (name, address, city, state, zip, description, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.name)
        .bind(&new.address)
        .bind(&new.city)
        .bind(&new.state)
        .bind(&new.zip)
        .bind(&new.description)
        .bind(&new.status)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();
        for pet_id in &new.pet_ids {
            insert_link(&mut tx, id, *pet_id).await?;
        }
        tx.commit().await?;

        info!(application_id = id, pets = new.pet_ids.len(), status = %new.status, "application submitted");
        Self::find(pool, id).await
    }

    /// Link a pet to an application. Linking the same pet twice is a no-op.
    pub async fn add_pet(pool: &SqlitePool, app_id: i64, pet_id: i64) -> Result<ApplicationDetail, AppError> {
        Self::find(pool, app_id).await?;
        let pet_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM pets WHERE id = ?")
            .bind(pet_id)
            .fetch_optional(pool)
            .await?;
        if pet_exists.is_none() {
            return Err(AppError::not_found("pet", pet_id));
        }
        let mut conn = pool.acquire().await?;
        insert_link(&mut conn, app_id, pet_id).await?;
        info!(application_id = app_id, pet_id, "pet linked to application");
        Self::detail(pool, app_id).await
    }

    pub async fn is_linked(pool: &SqlitePool, app_id: i64, pet_id: i64) -> Result<bool, AppError> {
        let found: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM pet_applications WHERE application_id = ? AND pet_id = ?",
        )
        .bind(app_id)
        .bind(pet_id)
        .fetch_optional(pool)
        .await?;
        Ok(found.is_some())
    }

    /// Admin status change. The value is free text but may not be blank.
    pub async fn update_status(pool: &SqlitePool, id: i64, status: Option<&Value>) -> Result<Application, AppError> {
        Self::find(pool, id).await?;
        let mut errors = FieldErrors::new();
        let status = errors.text("status", status);
        let Some(status) = status else {
            return Err(errors.into_error(format!("/admin/applications/{id}")));
        };
        sqlx::query("UPDATE applications SET status = ?, updated_at = ? WHERE id = ?")
            .bind(&status)
            .bind(Utc::now())
            .bind(id)
            .execute(pool)
            .await?;
        info!(application_id = id, status = %status, "application status changed");
        Self::find(pool, id).await
    }

    /// Record an approval decision for one pet on an application and flip the pet's
    /// adoptability. Once every linked pet is decided the application is Accepted
    /// (all approved) or Rejected (any rejected).
    pub async fn decide(pool: &SqlitePool, app_id: i64, pet_id: i64, approval: Approval) -> Result<Pet, AppError> {
        Self::find(pool, app_id).await?;
        let mut tx = pool.begin().await?;
        let updated = sqlx::query(
            "UPDATE pet_applications SET approval = ? WHERE application_id = ? AND pet_id = ?",
        )
        .bind(approval.as_str())
        .bind(app_id)
        .bind(pet_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if updated == 0 {
            return Err(AppError::NotFound(format!(
                "pet {pet_id} on application {app_id}"
            )));
        }

        let now = Utc::now();
        sqlx::query("UPDATE pets SET adoptable = ?, updated_at = ? WHERE id = ?")
            .bind(approval.adoptable())
            .bind(now)
            .bind(pet_id)
            .execute(&mut *tx)
            .await?;

        let decisions: Vec<Option<String>> =
            sqlx::query_scalar("SELECT approval FROM pet_applications WHERE application_id = ?")
                .bind(app_id)
                .fetch_all(&mut *tx)
                .await?;
        if let Some(status) = rolled_up_status(&decisions) {
            sqlx::query("UPDATE applications SET status = ?, updated_at = ? WHERE id = ?")
                .bind(status.as_str())
                .bind(now)
                .bind(app_id)
                .execute(&mut *tx)
                .await?;
            info!(application_id = app_id, status = status.as_str(), "application decided");
        }
        tx.commit().await?;

        info!(application_id = app_id, pet_id, approval = approval.as_str(), "pet decision recorded");
        sqlx::query_as::<_, Pet>("SELECT * FROM pets WHERE id = ?")
            .bind(pet_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::not_found("pet", pet_id))
    }
}

async fn insert_link(conn: &mut SqliteConnection, app_id: i64, pet_id: i64) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO pet_applications (application_id, pet_id, created_at)
        VALUES (?, ?, ?)
        ON CONFLICT (application_id, pet_id) DO NOTHING
        "#,
    )
    .bind(app_id)
    .bind(pet_id)
    .bind(Utc::now())
    .execute(conn)
    .await?;
    Ok(())
}

/// None while any pet is undecided.
fn rolled_up_status(decisions: &[Option<String>]) -> Option<ApplicationStatus> {
    let decided: Option<Vec<Approval>> = decisions
        .iter()
        .map(|d| d.as_deref().and_then(Approval::parse))
        .collect();
    let decided = decided.filter(|d| !d.is_empty())?;
    if decided.iter().all(|a| *a == Approval::Approved) {
        Some(ApplicationStatus::Accepted)
    } else {
        Some(ApplicationStatus::Rejected)
    }
}

fn validate_new(params: &ApplicationParams) -> Result<NewApplication, AppError> {
    let mut errors = FieldErrors::new();
    let name = errors.text("name", params.name.as_ref());
    let address = errors.text("address", params.address.as_ref());
    let city = errors.text("city", params.city.as_ref());
    let state = errors.text("state", params.state.as_ref());
    let zip = errors.text("zip", params.zip.as_ref());
    let description = errors.text("description", params.description.as_ref());
    let status = errors.text("status", params.status.as_ref());

    let (Some(name), Some(address), Some(city), Some(state), Some(zip), Some(description), Some(status)) =
        (name, address, city, state, zip, description, status)
    else {
        return Err(errors.into_error_with_message(INCOMPLETE_APPLICATION, "/applications/new"));
    };
    let pet_ids = parse_pet_ids(&mut errors, params.pet_ids.as_ref());
    errors.into_result("/applications/new")?;
    Ok(NewApplication {
        name,
        address,
        city,
        state,
        zip,
        description,
        status,
        pet_ids,
    })
}

/// `pet_ids` is optional; when present it must be an array of ids.
fn parse_pet_ids(errors: &mut FieldErrors, value: Option<&Value>) -> Vec<i64> {
    let items = match value {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => {
            errors.add("pet_ids", "is invalid");
            return Vec::new();
        }
    };
    let ids: Option<Vec<i64>> = items.iter().map(parse_id_value).collect();
    ids.unwrap_or_else(|| {
        errors.add("pet_ids", "is invalid");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{link, seed_application, seed_pet, seed_shelter, test_pool};
    use serde_json::json;

    fn params(value: serde_json::Value) -> ApplicationParams {
        serde_json::from_value(value).unwrap()
    }

    fn complete() -> serde_json::Value {
        json!({
            "name": "Roman",
            "address": "444 Berry Way",
            "city": "Boulder",
            "state": "CO",
            "zip": "88888",
            "description": "A loving family.",
            "status": "In Progress"
        })
    }

    async fn count(pool: &SqlitePool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM applications")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn complete_submission_creates_one_application() {
        let pool = test_pool().await;
        let app = ApplicationService::create(&pool, &params(complete())).await.unwrap();
        assert_eq!(app.name, "Roman");
        assert_eq!(app.address, "444 Berry Way");
        assert_eq!(app.description, "A loving family.");
        assert_eq!(app.status, "In Progress");
        assert_eq!(count(&pool).await, 1);
    }

    #[tokio::test]
    async fn missing_field_rejects_with_uniform_message() {
        let pool = test_pool().await;
        let result = ApplicationService::create(&pool, &params(json!({"name": "Sir TP"}))).await;
        match result {
            Err(AppError::Validation(failure)) => {
                assert_eq!(failure.message, INCOMPLETE_APPLICATION);
                assert_eq!(failure.redirect_to, "/applications/new");
                assert_eq!(failure.errors.len(), 6);
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert_eq!(count(&pool).await, 0);
    }

    #[tokio::test]
    async fn submission_links_requested_pets() {
        let pool = test_pool().await;
        let shelter = seed_shelter(&pool, "Paw Patrol", "Denver", true, 2.0).await;
        let pet = seed_pet(&pool, shelter.id, "Buster", "mut", 7, true).await;
        let mut body = complete();
        body["pet_ids"] = json!([pet.id]);

        let app = ApplicationService::create(&pool, &params(body)).await.unwrap();
        let detail = ApplicationService::detail(&pool, app.id).await.unwrap();
        assert_eq!(detail.pets.len(), 1);
        assert_eq!(detail.pets[0].pet.id, pet.id);
        assert_eq!(detail.pets[0].approval, None);
    }

    #[tokio::test]
    async fn submission_with_unknown_pet_stores_nothing() {
        let pool = test_pool().await;
        let mut body = complete();
        body["pet_ids"] = json!([404]);
        match ApplicationService::create(&pool, &params(body)).await {
            Err(AppError::Validation(failure)) => {
                assert_eq!(failure.message, "Error: Pet ids references missing pet 404");
                assert_eq!(failure.redirect_to, "/applications/new");
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert_eq!(count(&pool).await, 0);
    }

    #[tokio::test]
    async fn each_blank_field_rejects_the_submission() {
        let pool = test_pool().await;
        for field in ["name", "address", "city", "state", "zip", "description", "status"] {
            for blank in [json!(null), json!(""), json!("   ")] {
                let mut body = complete();
                body[field] = blank.clone();
                match ApplicationService::create(&pool, &params(body)).await {
                    Err(AppError::Validation(failure)) => {
                        assert_eq!(failure.message, INCOMPLETE_APPLICATION, "{field} = {blank}");
                        assert_eq!(failure.redirect_to, "/applications/new");
                        assert_eq!(failure.errors.len(), 1, "{field} = {blank}");
                    }
                    other => panic!("{field} = {blank}: expected validation failure, got {other:?}"),
                }
            }
        }
        assert_eq!(count(&pool).await, 0);
    }

    #[tokio::test]
    async fn numeric_fields_are_accepted_as_text() {
        let pool = test_pool().await;
        let mut body = complete();
        body["zip"] = json!(80202);
        let app = ApplicationService::create(&pool, &params(body)).await.unwrap();
        assert_eq!(app.zip, "80202");
    }

    #[tokio::test]
    async fn malformed_pet_ids_are_rejected() {
        let pool = test_pool().await;
        let mut body = complete();
        body["pet_ids"] = json!("7");
        match ApplicationService::create(&pool, &params(body)).await {
            Err(AppError::Validation(failure)) => {
                assert_eq!(failure.message, "Error: Pet ids is invalid");
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert_eq!(count(&pool).await, 0);
    }

    #[tokio::test]
    async fn add_pet_is_idempotent() {
        let pool = test_pool().await;
        let shelter = seed_shelter(&pool, "Paw Patrol", "Denver", true, 2.0).await;
        let pet = seed_pet(&pool, shelter.id, "Buster", "mut", 7, true).await;
        let app = seed_application(&pool, "Charles", "In Progress").await;

        ApplicationService::add_pet(&pool, app.id, pet.id).await.unwrap();
        let detail = ApplicationService::add_pet(&pool, app.id, pet.id).await.unwrap();
        assert_eq!(detail.pets.len(), 1);
        assert!(matches!(
            ApplicationService::add_pet(&pool, app.id, 999).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn decisions_toggle_adoptability_and_roll_up() {
        let pool = test_pool().await;
        let shelter = seed_shelter(&pool, "Paw Patrol", "Denver", true, 2.0).await;
        let buster = seed_pet(&pool, shelter.id, "Buster", "mut", 7, true).await;
        let kyo = seed_pet(&pool, shelter.id, "Kyo", "calico", 1, true).await;
        let app = seed_application(&pool, "TP", "Pending").await;
        link(&pool, app.id, buster.id).await;
        link(&pool, app.id, kyo.id).await;

        let pet = ApplicationService::decide(&pool, app.id, buster.id, Approval::Approved)
            .await
            .unwrap();
        assert!(!pet.adoptable);
        assert_eq!(ApplicationService::find(&pool, app.id).await.unwrap().status, "Pending");

        ApplicationService::decide(&pool, app.id, kyo.id, Approval::Approved)
            .await
            .unwrap();
        assert_eq!(ApplicationService::find(&pool, app.id).await.unwrap().status, "Accepted");

        let pet = ApplicationService::decide(&pool, app.id, kyo.id, Approval::Rejected)
            .await
            .unwrap();
        assert!(pet.adoptable);
        assert_eq!(ApplicationService::find(&pool, app.id).await.unwrap().status, "Rejected");
    }

    #[tokio::test]
    async fn deciding_an_unlinked_pet_is_not_found() {
        let pool = test_pool().await;
        let shelter = seed_shelter(&pool, "Paw Patrol", "Denver", true, 2.0).await;
        let pet = seed_pet(&pool, shelter.id, "Buster", "mut", 7, true).await;
        let app = seed_application(&pool, "TP", "Pending").await;

        assert!(matches!(
            ApplicationService::decide(&pool, app.id, pet.id, Approval::Approved).await,
            Err(AppError::NotFound(_))
        ));
        assert!(ApplicationService::find(&pool, app.id).await.is_ok());
    }

    #[tokio::test]
    async fn status_change_rejects_blank() {
        let pool = test_pool().await;
        let app = seed_application(&pool, "TP", "In Progress").await;
        let updated = ApplicationService::update_status(&pool, app.id, Some(&json!("Pending")))
            .await
            .unwrap();
        assert_eq!(updated.status, "Pending");
        assert!(matches!(
            ApplicationService::update_status(&pool, app.id, Some(&json!(""))).await,
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn roll_up_waits_for_every_pet() {
        let approved = Some("Approved".to_string());
        let rejected = Some("Rejected".to_string());
        assert_eq!(rolled_up_status(&[approved.clone(), None]), None);
        assert_eq!(rolled_up_status(&[]), None);
        assert_eq!(
            rolled_up_status(&[approved.clone(), approved.clone()]),
            Some(ApplicationStatus::Accepted)
        );
        assert_eq!(
            rolled_up_status(&[approved, rejected]),
            Some(ApplicationStatus::Rejected)
        );
    }
}
