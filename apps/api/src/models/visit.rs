use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One attendance event, recorded against a subscription.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Visit {
    pub id: i64,
    pub subscription_id: i64,
    pub date: NaiveDate,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateVisitRequest {
    pub subscription_id: Option<i64>,
    pub date: Option<NaiveDate>,
}

/// Body of `PUT /visits/:id`. Only the date can change.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateVisitRequest {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewVisit {
    pub subscription_id: i64,
    pub date: NaiveDate,
}
