use crate::{
    error::ApiError,
    models::{CheckCreate, CheckRecord},
};
use async_trait::async_trait;
use std::sync::Mutex;
use uuid::Uuid;

use super::CheckRepository;

/// In-memory record store double for exercising services without a database.
pub struct InMemoryCheckRepository {
    pub records: Mutex<Vec<CheckRecord>>,
}

impl InMemoryCheckRepository {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CheckRepository for InMemoryCheckRepository {
    async fn create(&self, check: &CheckCreate) -> Result<CheckRecord, ApiError> {
        let record = CheckRecord {
            id: Uuid::new_v4(),
            full_name: check.full_name.clone(),
            staff: check.staff.clone(),
            date: check.date,
            matched: check.matched,
            matched_id: check.matched_id.clone(),
        };
        self.records.lock().unwrap().push(record.clone());
        Ok(record)
    }
}

/// Record store double that fails every write, simulating a lost connection.
pub struct FailingCheckRepository;

#[async_trait]
impl CheckRepository for FailingCheckRepository {
    async fn create(&self, _check: &CheckCreate) -> Result<CheckRecord, ApiError> {
        Err(ApiError::Database(sqlx::Error::PoolClosed))
    }
}
