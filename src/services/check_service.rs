use std::sync::Arc;

use crate::{
    error::ApiError,
    models::{CheckCreate, CheckRequest, CheckResponse},
    repositories::CheckRepository,
    services::{
        external::OpenSanctionsClient,
        report_service::{ReportGenerator, ReportInput},
    },
};

/// Orchestrates one screening end to end: validate, screen, persist,
/// report. The request fails as a unit on the first error; there are no
/// partial retries between steps, and a failure after a successful screen
/// loses that screening result.
pub struct CheckService {
    check_repo: Arc<dyn CheckRepository + Send + Sync>,
    screening_client: Arc<OpenSanctionsClient>,
    report_generator: Arc<ReportGenerator>,
}

impl CheckService {
    pub fn new(
        check_repo: Arc<dyn CheckRepository + Send + Sync>,
        screening_client: Arc<OpenSanctionsClient>,
        report_generator: Arc<ReportGenerator>,
    ) -> Self {
        Self {
            check_repo,
            screening_client,
            report_generator,
        }
    }

    pub async fn run_check(&self, request: CheckRequest) -> Result<CheckResponse, ApiError> {
        // Invalid input never reaches the screening client.
        let full_name = request.full_name.trim();
        if full_name.is_empty() {
            return Err(ApiError::validation("fullName must not be empty"));
        }
        let staff = request.staff.trim();
        if staff.is_empty() {
            return Err(ApiError::validation("staff must not be empty"));
        }

        let outcome = self.screening_client.match_person(full_name).await?;

        let record = self
            .check_repo
            .create(&CheckCreate {
                full_name: full_name.to_string(),
                staff: staff.to_string(),
                date: chrono::Utc::now(),
                matched: outcome.matched,
                matched_id: outcome.matched_id,
            })
            .await?;

        self.report_generator
            .generate(&ReportInput {
                check_id: record.id,
                full_name: record.full_name.clone(),
                staff: record.staff.clone(),
                matched: record.matched,
                checked_at: record.date,
            })
            .await?;

        tracing::info!(
            check_id = %record.id,
            matched = record.matched,
            "sanctions check completed"
        );

        Ok(CheckResponse {
            matched: record.matched,
            pdf_url: format!("/reports/{}.pdf", record.id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::{FailingCheckRepository, InMemoryCheckRepository};
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service_with(
        repo: Arc<dyn CheckRepository + Send + Sync>,
        server: &MockServer,
        report_dir: &TempDir,
    ) -> CheckService {
        let client = OpenSanctionsClient::new(Some("test-key".to_string()))
            .with_base_url(server.uri());
        let generator =
            ReportGenerator::new(report_dir.path(), "compliance@example.com").unwrap();
        CheckService::new(repo, Arc::new(client), Arc::new(generator))
    }

    fn request(full_name: &str, staff: &str) -> CheckRequest {
        CheckRequest {
            full_name: full_name.to_string(),
            staff: staff.to_string(),
        }
    }

    async fn mount_clear_response(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/match/sanctions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"results":{"q1":{"match":null}}}"#),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn clear_screening_persists_one_record_and_writes_a_report() {
        let server = MockServer::start().await;
        mount_clear_response(&server).await;
        let report_dir = TempDir::new().unwrap();
        let repo = Arc::new(InMemoryCheckRepository::new());
        let service = service_with(repo.clone(), &server, &report_dir);

        let response = service.run_check(request("Jane Doe", "agent-7")).await.unwrap();

        assert!(!response.matched);

        let records = repo.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.full_name, "Jane Doe");
        assert_eq!(record.staff, "agent-7");
        assert!(!record.matched);
        assert!(record.matched_id.is_none());

        assert_eq!(response.pdf_url, format!("/reports/{}.pdf", record.id));
        assert!(report_dir
            .path()
            .join(format!("{}.pdf", record.id))
            .exists());
    }

    #[tokio::test]
    async fn matched_screening_records_the_upstream_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/match/sanctions"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"results":{"q1":{"match":{"id":"Q7805"}}}}"#,
            ))
            .mount(&server)
            .await;
        let report_dir = TempDir::new().unwrap();
        let repo = Arc::new(InMemoryCheckRepository::new());
        let service = service_with(repo.clone(), &server, &report_dir);

        let response = service.run_check(request("Jane Doe", "agent-7")).await.unwrap();

        assert!(response.matched);
        let records = repo.records.lock().unwrap();
        assert!(records[0].matched);
        assert_eq!(records[0].matched_id.as_deref(), Some("Q7805"));
    }

    #[tokio::test]
    async fn identical_input_produces_two_distinct_records() {
        let server = MockServer::start().await;
        mount_clear_response(&server).await;
        let report_dir = TempDir::new().unwrap();
        let repo = Arc::new(InMemoryCheckRepository::new());
        let service = service_with(repo.clone(), &server, &report_dir);

        service.run_check(request("Jane Doe", "agent-7")).await.unwrap();
        service.run_check(request("Jane Doe", "agent-7")).await.unwrap();

        let records = repo.records.lock().unwrap();
        assert_eq!(records.len(), 2);
        assert_ne!(records[0].id, records[1].id);
    }

    #[tokio::test]
    async fn screening_failure_creates_no_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/match/sanctions"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let report_dir = TempDir::new().unwrap();
        let repo = Arc::new(InMemoryCheckRepository::new());
        let service = service_with(repo.clone(), &server, &report_dir);

        let err = service
            .run_check(request("Jane Doe", "agent-7"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Screening(_)));
        assert!(repo.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn persistence_failure_never_invokes_the_report_generator() {
        let server = MockServer::start().await;
        mount_clear_response(&server).await;
        let report_dir = TempDir::new().unwrap();
        let service = service_with(Arc::new(FailingCheckRepository), &server, &report_dir);

        let err = service
            .run_check(request("Jane Doe", "agent-7"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Database(_)));
        assert_eq!(std::fs::read_dir(report_dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn blank_input_fails_before_any_external_call() {
        // No mock is mounted; a request reaching the server would come back
        // as a screening error rather than a validation error.
        let server = MockServer::start().await;
        let report_dir = TempDir::new().unwrap();
        let repo = Arc::new(InMemoryCheckRepository::new());
        let service = service_with(repo.clone(), &server, &report_dir);

        let err = service.run_check(request("   ", "agent-7")).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let err = service.run_check(request("Jane Doe", "")).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        assert!(repo.records.lock().unwrap().is_empty());
    }
}
