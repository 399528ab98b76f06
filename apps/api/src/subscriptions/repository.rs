use async_trait::async_trait;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::subscription::{NewSubscription, Subscription};
use crate::subscriptions::validation::{unknown_user, DATE_RANGE};
use crate::validation::FieldErrors;

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn insert(&self, subscription: NewSubscription) -> Result<Subscription, AppError>;
    async fn list(&self) -> Result<Vec<Subscription>, AppError>;
    async fn find(&self, id: i64) -> Result<Option<Subscription>, AppError>;
    /// Overwrites every mutable column. `None` if the row no longer exists.
    async fn update(&self, subscription: &Subscription) -> Result<Option<Subscription>, AppError>;
    /// Removes the subscription and its visits.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

pub struct PgSubscriptionRepository {
    pool: PgPool,
}

impl PgSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Constraint violations that slipped past the handler's own checks
/// (e.g. the user was deleted in between) are still reported per field.
fn map_write_error(err: sqlx::Error, user_id: i64) -> AppError {
    match err {
        sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
            AppError::Validation(unknown_user(user_id))
        }
        sqlx::Error::Database(ref db) if db.is_check_violation() => {
            AppError::Validation(FieldErrors::single("end_date", DATE_RANGE))
        }
        other => AppError::Database(other),
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn insert(&self, subscription: NewSubscription) -> Result<Subscription, AppError> {
        sqlx::query_as::<_, Subscription>(
            r#"
            INSERT INTO subscriptions (user_id, start_date, end_date, price, "type")
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, start_date, end_date, price, "type"
            "#,
        )
        .bind(subscription.user_id)
        .bind(subscription.start_date)
        .bind(subscription.end_date)
        .bind(subscription.price)
        .bind(&subscription.kind)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, subscription.user_id))
    }

    async fn list(&self) -> Result<Vec<Subscription>, AppError> {
        Ok(sqlx::query_as::<_, Subscription>(
            r#"SELECT id, user_id, start_date, end_date, price, "type" FROM subscriptions ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn find(&self, id: i64) -> Result<Option<Subscription>, AppError> {
        Ok(sqlx::query_as::<_, Subscription>(
            r#"SELECT id, user_id, start_date, end_date, price, "type" FROM subscriptions WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn update(&self, subscription: &Subscription) -> Result<Option<Subscription>, AppError> {
        sqlx::query_as::<_, Subscription>(
            r#"
            UPDATE subscriptions
            SET user_id = $2, start_date = $3, end_date = $4, price = $5, "type" = $6
            WHERE id = $1
            RETURNING id, user_id, start_date, end_date, price, "type"
            "#,
        )
        .bind(subscription.id)
        .bind(subscription.user_id)
        .bind(subscription.start_date)
        .bind(subscription.end_date)
        .bind(subscription.price)
        .bind(&subscription.kind)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, subscription.user_id))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
