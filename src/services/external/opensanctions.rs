use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const DEFAULT_BASE_URL: &str = "https://api.opensanctions.org";

#[derive(Debug, Clone, Serialize)]
struct MatchRequest<'a> {
    queries: HashMap<&'static str, MatchQuery<'a>>,
}

#[derive(Debug, Clone, Serialize)]
struct MatchQuery<'a> {
    schema: &'static str,
    properties: PersonProperties<'a>,
}

#[derive(Debug, Clone, Serialize)]
struct PersonProperties<'a> {
    name: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct MatchResponse {
    pub results: MatchResults,
}

#[derive(Debug, Deserialize)]
pub struct MatchResults {
    pub q1: QueryResult,
}

#[derive(Debug, Deserialize)]
pub struct QueryResult {
    /// Null when the queried name is clear, an entity otherwise.
    #[serde(rename = "match")]
    pub matched: Option<MatchedEntity>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchedEntity {
    pub id: String,
}

/// Interpreted screening result: `matched_id` is present iff `matched`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningOutcome {
    pub matched: bool,
    pub matched_id: Option<String>,
}

/// OpenSanctions match API client. One attempt per invocation, no retry
/// and no request timeout.
pub struct OpenSanctionsClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl OpenSanctionsClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the client at an alternate endpoint, e.g. a self-hosted yente
    /// instance or a mock server in tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Best-algorithm match query with the name as the sole identifying
    /// property of a Person schema.
    pub async fn match_person(&self, full_name: &str) -> Result<ScreeningOutcome, ApiError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ApiError::screening("OpenSanctions API key not configured")
        })?;

        let url = format!("{}/match/sanctions?algorithm=best", self.base_url);

        let mut queries = HashMap::new();
        queries.insert(
            "q1",
            MatchQuery {
                schema: "Person",
                properties: PersonProperties {
                    name: vec![full_name],
                },
            },
        );

        tracing::debug!(name = %full_name, "querying OpenSanctions match API");

        let response = self
            .client
            .post(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("ApiKey {}", api_key),
            )
            .json(&MatchRequest { queries })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::Screening(format!(
                "OpenSanctions returned status {}",
                response.status()
            )));
        }

        let response_text = response.text().await?;

        let parsed: MatchResponse = serde_json::from_str(&response_text).map_err(|e| {
            ApiError::Screening(format!("Failed to parse OpenSanctions response: {}", e))
        })?;

        let matched = parsed.results.q1.matched;

        Ok(ScreeningOutcome {
            matched: matched.is_some(),
            matched_id: matched.map(|entity| entity.id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenSanctionsClient {
        OpenSanctionsClient::new(Some("test-key".to_string())).with_base_url(server.uri())
    }

    #[tokio::test]
    async fn null_match_is_interpreted_as_clear() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/match/sanctions"))
            .and(query_param("algorithm", "best"))
            .and(header("authorization", "ApiKey test-key"))
            .and(body_json(serde_json::json!({
                "queries": {
                    "q1": {
                        "schema": "Person",
                        "properties": { "name": ["Jane Doe"] }
                    }
                }
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"{"results":{"q1":{"match":null}}}"#),
            )
            .mount(&server)
            .await;

        let outcome = client_for(&server).match_person("Jane Doe").await.unwrap();
        assert!(!outcome.matched);
        assert!(outcome.matched_id.is_none());
    }

    #[tokio::test]
    async fn entity_match_carries_the_upstream_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/match/sanctions"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"results":{"q1":{"match":{"id":"Q7805","score":0.97}}}}"#,
            ))
            .mount(&server)
            .await;

        let outcome = client_for(&server).match_person("Jane Doe").await.unwrap();
        assert!(outcome.matched);
        assert_eq!(outcome.matched_id.as_deref(), Some("Q7805"));
    }

    #[tokio::test]
    async fn non_success_status_is_a_screening_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/match/sanctions"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .match_person("Jane Doe")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Screening(_)));
    }

    #[tokio::test]
    async fn malformed_body_is_a_screening_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/match/sanctions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .match_person("Jane Doe")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Screening(_)));
    }

    #[tokio::test]
    async fn missing_api_key_fails_without_calling_upstream() {
        let client = OpenSanctionsClient::new(None);
        assert!(!client.is_configured());

        let err = client.match_person("Jane Doe").await.unwrap_err();
        assert!(matches!(err, ApiError::Screening(_)));
    }
}
