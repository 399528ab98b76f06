use async_trait::async_trait;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::visit::{NewVisit, Visit};
use crate::visits::validation::unknown_subscription;

#[async_trait]
pub trait VisitRepository: Send + Sync {
    async fn insert(&self, visit: NewVisit) -> Result<Visit, AppError>;
    async fn list(&self) -> Result<Vec<Visit>, AppError>;
    async fn list_for_subscription(&self, subscription_id: i64) -> Result<Vec<Visit>, AppError>;
    async fn find(&self, id: i64) -> Result<Option<Visit>, AppError>;
    async fn update(&self, visit: &Visit) -> Result<Option<Visit>, AppError>;
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

pub struct PgVisitRepository {
    pool: PgPool,
}

impl PgVisitRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// The subscription can be deleted between the handler's lookup and the insert.
fn map_insert_error(err: sqlx::Error, subscription_id: i64) -> AppError {
    match err {
        sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
            AppError::Validation(unknown_subscription(subscription_id))
        }
        other => AppError::Database(other),
    }
}

#[async_trait]
impl VisitRepository for PgVisitRepository {
    async fn insert(&self, visit: NewVisit) -> Result<Visit, AppError> {
        sqlx::query_as::<_, Visit>(
            r#"
            INSERT INTO visits (subscription_id, date)
            VALUES ($1, $2)
            RETURNING id, subscription_id, date
            "#,
        )
        .bind(visit.subscription_id)
        .bind(visit.date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, visit.subscription_id))
    }

    async fn list(&self) -> Result<Vec<Visit>, AppError> {
        Ok(
            sqlx::query_as::<_, Visit>("SELECT id, subscription_id, date FROM visits ORDER BY id")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn list_for_subscription(&self, subscription_id: i64) -> Result<Vec<Visit>, AppError> {
        Ok(sqlx::query_as::<_, Visit>(
            r#"
            SELECT id, subscription_id, date
            FROM visits
            WHERE subscription_id = $1
            ORDER BY date, id
            "#,
        )
        .bind(subscription_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find(&self, id: i64) -> Result<Option<Visit>, AppError> {
        Ok(
            sqlx::query_as::<_, Visit>("SELECT id, subscription_id, date FROM visits WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn update(&self, visit: &Visit) -> Result<Option<Visit>, AppError> {
        Ok(sqlx::query_as::<_, Visit>(
            "UPDATE visits SET date = $2 WHERE id = $1 RETURNING id, subscription_id, date",
        )
        .bind(visit.id)
        .bind(visit.date)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM visits WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
