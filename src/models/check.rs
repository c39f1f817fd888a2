use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One persisted screening outcome. Created exactly once per successful
/// screening call and immutable thereafter; `matched_id` is set iff
/// `matched` is true.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct CheckRecord {
    pub id: Uuid,
    pub full_name: String,
    pub staff: String,
    pub date: DateTime<Utc>,
    pub matched: bool,
    pub matched_id: Option<String>,
}

/// Insert payload for a new check; the repository assigns the id.
#[derive(Debug, Clone)]
pub struct CheckCreate {
    pub full_name: String,
    pub staff: String,
    pub date: DateTime<Utc>,
    pub matched: bool,
    pub matched_id: Option<String>,
}

/// Request body for `POST /api/check`.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckRequest {
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub staff: String,
}

/// Response body for `POST /api/check`.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResponse {
    #[serde(rename = "match")]
    pub matched: bool,
    #[serde(rename = "pdfUrl")]
    pub pdf_url: String,
}
