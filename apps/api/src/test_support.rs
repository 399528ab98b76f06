//! In-memory store and request helpers for handler tests.
//!
//! `MemoryStore` implements every repository trait over one set of tables so
//! that cascading deletes behave exactly like the PostgreSQL schema.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::error::{DatabaseError, ErrorKind};
use tower::ServiceExt;

use crate::config::Config;
use crate::errors::AppError;
use crate::models::subscription::{NewSubscription, Subscription};
use crate::models::user::{NewUser, User};
use crate::models::visit::{NewVisit, Visit};
use crate::routes::build_router;
use crate::state::AppState;
use crate::subscriptions::SubscriptionRepository;
use crate::users::validation::EMAIL_TAKEN;
use crate::users::UserRepository;
use crate::validation::FieldErrors;
use crate::visits::VisitRepository;

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<i64, User>,
    subscriptions: BTreeMap<i64, Subscription>,
    visits: BTreeMap<i64, Visit>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn remove_subscription(&mut self, id: i64) -> bool {
        let existed = self.subscriptions.remove(&id).is_some();
        self.visits.retain(|_, v| v.subscription_id != id);
        existed
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn user_count(&self) -> usize {
        self.tables.lock().unwrap().users.len()
    }

    pub fn subscription_count(&self) -> usize {
        self.tables.lock().unwrap().subscriptions.len()
    }

    pub fn visit_count(&self) -> usize {
        self.tables.lock().unwrap().visits.len()
    }

    pub fn stored_user(&self, id: i64) -> Option<User> {
        self.tables.lock().unwrap().users.get(&id).cloned()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: NewUser) -> Result<User, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(FieldErrors::single("email", EMAIL_TAKEN).into());
        }
        let id = tables.allocate_id();
        let user = User {
            id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_hash: user.password_hash,
        };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.tables.lock().unwrap().users.values().cloned().collect())
    }

    async fn find(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.tables.lock().unwrap().users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn update(&self, user: &User) -> Result<Option<User>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.users.get_mut(&user.id).map(|stored| {
            stored.first_name = user.first_name.clone();
            stored.last_name = user.last_name.clone();
            stored.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }
        let owned: Vec<i64> = tables
            .subscriptions
            .values()
            .filter(|s| s.user_id == id)
            .map(|s| s.id)
            .collect();
        for subscription_id in owned {
            tables.remove_subscription(subscription_id);
        }
        Ok(true)
    }
}

#[async_trait]
impl SubscriptionRepository for MemoryStore {
    async fn insert(&self, subscription: NewSubscription) -> Result<Subscription, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.allocate_id();
        let subscription = Subscription {
            id,
            user_id: subscription.user_id,
            start_date: subscription.start_date,
            end_date: subscription.end_date,
            price: subscription.price,
            kind: subscription.kind,
        };
        tables.subscriptions.insert(id, subscription.clone());
        Ok(subscription)
    }

    async fn list(&self) -> Result<Vec<Subscription>, AppError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .subscriptions
            .values()
            .cloned()
            .collect())
    }

    async fn find(&self, id: i64) -> Result<Option<Subscription>, AppError> {
        Ok(self.tables.lock().unwrap().subscriptions.get(&id).cloned())
    }

    async fn update(&self, subscription: &Subscription) -> Result<Option<Subscription>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables
            .subscriptions
            .get_mut(&subscription.id)
            .map(|stored| {
                *stored = subscription.clone();
                stored.clone()
            }))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.tables.lock().unwrap().remove_subscription(id))
    }
}

#[async_trait]
impl VisitRepository for MemoryStore {
    async fn insert(&self, visit: NewVisit) -> Result<Visit, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let id = tables.allocate_id();
        let visit = Visit {
            id,
            subscription_id: visit.subscription_id,
            date: visit.date,
        };
        tables.visits.insert(id, visit.clone());
        Ok(visit)
    }

    async fn list(&self) -> Result<Vec<Visit>, AppError> {
        Ok(self.tables.lock().unwrap().visits.values().cloned().collect())
    }

    async fn list_for_subscription(&self, subscription_id: i64) -> Result<Vec<Visit>, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut visits: Vec<Visit> = tables
            .visits
            .values()
            .filter(|v| v.subscription_id == subscription_id)
            .cloned()
            .collect();
        visits.sort_by_key(|v| (v.date, v.id));
        Ok(visits)
    }

    async fn find(&self, id: i64) -> Result<Option<Visit>, AppError> {
        Ok(self.tables.lock().unwrap().visits.get(&id).cloned())
    }

    async fn update(&self, visit: &Visit) -> Result<Option<Visit>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.visits.get_mut(&visit.id).map(|stored| {
            stored.date = visit.date;
            stored.clone()
        }))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.tables.lock().unwrap().visits.remove(&id).is_some())
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        database_max_connections: 1,
        port: 0,
        rust_log: "debug".to_string(),
        bcrypt_cost: 4,
    }
}

/// A router backed by a fresh in-memory store, plus the store for inspection.
pub fn test_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let state = AppState {
        users: store.clone(),
        subscriptions: store.clone(),
        visits: store.clone(),
        config: test_config(),
    };
    (build_router(state), store)
}

/// Sends one request through the router. Empty bodies come back as `Value::Null`.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// A database error of the given kind, as Postgres would report a violated constraint.
pub fn constraint_error(kind: ErrorKind) -> sqlx::Error {
    sqlx::Error::Database(Box::new(ConstraintViolation(kind)))
}

#[derive(Debug)]
struct ConstraintViolation(ErrorKind);

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "constraint violated: {:?}", self.0)
    }
}

impl std::error::Error for ConstraintViolation {}

impl DatabaseError for ConstraintViolation {
    fn message(&self) -> &str {
        "constraint violated"
    }

    fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self
    }

    fn kind(&self) -> ErrorKind {
        match self.0 {
            ErrorKind::UniqueViolation => ErrorKind::UniqueViolation,
            ErrorKind::ForeignKeyViolation => ErrorKind::ForeignKeyViolation,
            ErrorKind::NotNullViolation => ErrorKind::NotNullViolation,
            ErrorKind::CheckViolation => ErrorKind::CheckViolation,
            _ => ErrorKind::Other,
        }
    }
}
