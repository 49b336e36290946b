//! HTTP fetch collaborator backed by `reqwest`.

use anyhow::{Context, Result, bail};
use cinemeta_cache::{FetchedPayload, LocalFetch};
use reqwest::Client;

use super::types::{ApiEnvelope, embedded_error};

/// Network collaborator for the cache coordinator.
///
/// Any response that must never enter the cache is returned as an error:
/// transport failures, non-success statuses, and HTTP 200 bodies that embed
/// an `errorMessage`.
#[derive(Debug)]
pub struct HttpFetcher {
    /// HTTP client.
    http_client: Client,
}

impl HttpFetcher {
    /// Builds the fetcher with the given User-Agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the `reqwest::Client` build fails.
    pub fn new(user_agent: &str) -> Result<Self> {
        let http_client = Client::builder()
            .user_agent(user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { http_client })
    }

    /// Performs one GET without sniffing the body for embedded errors.
    ///
    /// Used by uncached endpoints that want to read the error payload
    /// themselves (e.g. usage checks).
    pub(crate) async fn fetch_raw(&self, url: &str) -> Result<FetchedPayload> {
        tracing::debug!(url, "API request");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request failed: {url}"))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .with_context(|| format!("failed to read response body: {url}"))?
            .to_vec();

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            bail!("API error (HTTP {status}): {text}");
        }

        Ok(FetchedPayload {
            body,
            status: status.as_u16(),
        })
    }
}

impl LocalFetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPayload> {
        let payload = self.fetch_raw(url).await?;

        if let Some(message) = sniff_embedded_error(&payload.body) {
            bail!("API error: {message}");
        }

        Ok(payload)
    }
}

/// Checks a JSON body for an embedded `errorMessage`.
///
/// Binary payloads (posters, images) do not start with `{` and are skipped.
fn sniff_embedded_error(body: &[u8]) -> Option<String> {
    if body.first() != Some(&b'{') {
        return None;
    }
    let envelope: ApiEnvelope = serde_json::from_slice(body).ok()?;
    embedded_error(envelope.error_message.as_ref()).map(String::from)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_sniff_error_in_json_body() {
        // Arrange
        let body = br#"{"results":null,"errorMessage":"Invalid API Key"}"#;

        // Act & Assert
        assert_eq!(
            sniff_embedded_error(body),
            Some(String::from("Invalid API Key"))
        );
    }

    #[test]
    fn test_sniff_ignores_success_and_binary_bodies() {
        // Arrange & Act & Assert
        assert_eq!(sniff_embedded_error(br#"{"errorMessage":""}"#), None);
        assert_eq!(sniff_embedded_error(&[0xFF, 0xD8, 0xFF, 0xE0]), None);
    }

    #[tokio::test]
    async fn test_fetch_returns_body_and_status() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .mount(&mock_server)
            .await;
        let fetcher = HttpFetcher::new("test/0.0.0").unwrap();

        // Act
        let payload = fetcher.fetch(&mock_server.uri()).await.unwrap();

        // Assert
        assert_eq!(payload.status, 200);
        assert_eq!(payload.body, br#"{"ok":true}"#.to_vec());
    }

    #[tokio::test]
    async fn test_fetch_rejects_http_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(503).set_body_string("down"))
            .mount(&mock_server)
            .await;
        let fetcher = HttpFetcher::new("test/0.0.0").unwrap();

        // Act
        let result = fetcher.fetch(&mock_server.uri()).await;

        // Assert
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("HTTP 503"));
    }

    #[tokio::test]
    async fn test_fetch_rejects_embedded_error_payload() {
        // Arrange: HTTP 200 with an error body must not look like success
        let mock_server = wiremock::MockServer::start().await;
        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(
                wiremock::ResponseTemplate::new(200)
                    .set_body_string(r#"{"results":null,"errorMessage":"Maximum usage"}"#),
            )
            .mount(&mock_server)
            .await;
        let fetcher = HttpFetcher::new("test/0.0.0").unwrap();

        // Act
        let result = fetcher.fetch(&mock_server.uri()).await;

        // Assert
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Maximum usage"));
    }
}
