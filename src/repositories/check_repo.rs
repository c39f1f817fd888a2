use crate::{
    database::DatabasePool,
    error::ApiError,
    models::{CheckCreate, CheckRecord},
};
use async_trait::async_trait;
use uuid::Uuid;

/// Record store for screening outcomes. Checks are written once and never
/// updated or deleted, so `create` is the whole contract.
#[async_trait]
pub trait CheckRepository {
    async fn create(&self, check: &CheckCreate) -> Result<CheckRecord, ApiError>;
}

pub struct SqlxCheckRepository {
    pool: DatabasePool,
}

impl SqlxCheckRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CheckRepository for SqlxCheckRepository {
    async fn create(&self, check: &CheckCreate) -> Result<CheckRecord, ApiError> {
        let id = Uuid::new_v4();

        let record = sqlx::query_as::<_, CheckRecord>(
            r#"
            INSERT INTO checks (id, full_name, staff, date, matched, matched_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, full_name, staff, date, matched, matched_id
            "#,
        )
        .bind(id)
        .bind(&check.full_name)
        .bind(&check.staff)
        .bind(check.date)
        .bind(check.matched)
        .bind(&check.matched_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }
}
