use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::domain::DomainError;

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn get_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, DomainError>;

    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<serde_json::Value, DomainError> {
        let response = request
            .send()
            .await
            .map_err(|e| DomainError::api(format!("Request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| DomainError::api(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(error_from_status(status, &text));
        }

        serde_json::from_str(&text)
            .map_err(|_| DomainError::api("Server returned non-JSON response"))
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a failed response to a domain error, preferring the envelope's `error` text
fn error_from_status(status: StatusCode, body: &str) -> DomainError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    if status == StatusCode::NOT_FOUND {
        DomainError::not_found(message)
    } else {
        DomainError::http(status.as_u16(), message)
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn get_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, DomainError> {
        let mut request = self.client.get(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        if !query.is_empty() {
            request = request.query(query);
        }

        self.send(request).await
    }

    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError> {
        let mut request = self.client.post(url);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        self.send(request.json(body)).await
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_json_sends_headers_and_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/organizations"))
            .and(query_param("page", "2"))
            .and(header("Authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "organizations": []
            })))
            .mount(&server)
            .await;

        let client = HttpClient::new();
        let url = format!("{}/api/organizations", server.uri());
        let json = client
            .get_json(&url, vec![("Authorization", "Bearer abc")], &[("page", "2".to_string())])
            .await
            .unwrap();

        assert_eq!(json["success"], true);
    }

    #[tokio::test]
    async fn test_not_found_maps_to_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/organizations/gone"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "success": false,
                "error": "Organization not found"
            })))
            .mount(&server)
            .await;

        let client = HttpClient::new();
        let url = format!("{}/api/organizations/gone", server.uri());
        let error = client.get_json(&url, vec![], &[]).await.unwrap_err();

        assert_eq!(error, DomainError::not_found("Organization not found"));
    }

    #[tokio::test]
    async fn test_server_error_without_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/users/subscribe"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = HttpClient::new();
        let url = format!("{}/api/users/subscribe", server.uri());
        let error = client
            .post_json(&url, vec![], &serde_json::json!({}))
            .await
            .unwrap_err();

        assert_eq!(error, DomainError::http(503, "HTTP 503"));
    }

    #[tokio::test]
    async fn test_non_json_body_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/players/p-1"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let client = HttpClient::new();
        let url = format!("{}/api/players/p-1", server.uri());
        let error = client.get_json(&url, vec![], &[]).await.unwrap_err();

        assert_eq!(error, DomainError::api("Server returned non-JSON response"));
    }
}
