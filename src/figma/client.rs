//! Figma API client for fetching design trees.

use reqwest::{header::RETRY_AFTER, Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::api_types::{FigmaFile, FigmaNodesResponse};
use crate::error::{DccError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.figma.com";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FigmaAuth {
    PersonalAccessToken(String),
    OAuthToken(String),
}

impl FigmaAuth {
    /// Reads `FIGMA_TOKEN`, then `FIGMA_OAUTH_TOKEN`. Empty values are ignored.
    pub fn from_env() -> Option<Self> {
        if let Ok(token) = std::env::var("FIGMA_TOKEN") {
            if !token.is_empty() {
                return Some(Self::PersonalAccessToken(token));
            }
        }

        if let Ok(token) = std::env::var("FIGMA_OAUTH_TOKEN") {
            if !token.is_empty() {
                return Some(Self::OAuthToken(token));
            }
        }

        None
    }

    fn token(&self) -> &str {
        match self {
            FigmaAuth::PersonalAccessToken(token) | FigmaAuth::OAuthToken(token) => token,
        }
    }

    fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        match self {
            FigmaAuth::PersonalAccessToken(token) => builder.header("X-FIGMA-TOKEN", token),
            FigmaAuth::OAuthToken(token) => builder.bearer_auth(token),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FigmaClient {
    http: Client,
    auth: FigmaAuth,
    base_url: Url,
}

impl FigmaClient {
    pub fn new(auth: FigmaAuth) -> Result<Self> {
        Self::with_base_url_and_timeout(auth, DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    pub fn with_base_url_and_timeout(
        auth: FigmaAuth,
        base_url: impl AsRef<str>,
        timeout: Duration,
    ) -> Result<Self> {
        if auth.token().trim().is_empty() {
            return Err(DccError::Config(
                "Missing Figma token; set FIGMA_TOKEN or FIGMA_OAUTH_TOKEN".to_string(),
            ));
        }
        let base_url = Url::parse(base_url.as_ref())?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(DccError::Network)?;

        Ok(Self {
            http,
            auth,
            base_url,
        })
    }

    pub async fn fetch_file(&self, file_key: &str) -> Result<FigmaFile> {
        validate_file_key(file_key)?;
        let url = self.endpoint(&format!("/v1/files/{file_key}"))?;
        debug!(%url, "fetching Figma file");
        self.send_json(self.auth.apply(self.http.get(url))).await
    }

    pub async fn fetch_nodes(&self, file_key: &str, node_ids: &[String]) -> Result<FigmaNodesResponse> {
        validate_file_key(file_key)?;
        if node_ids.is_empty() {
            return Err(DccError::Config(
                "node_ids cannot be empty when fetching nodes from Figma".into(),
            ));
        }

        let mut url = self.endpoint(&format!("/v1/files/{file_key}/nodes"))?;
        url.query_pairs_mut().append_pair("ids", &node_ids.join(","));
        debug!(%url, "fetching Figma nodes");
        self.send_json(self.auth.apply(self.http.get(url))).await
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(DccError::InvalidUrl)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await.map_err(DccError::Network)?;
        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            return serde_json::from_str(&body).map_err(DccError::Serialization);
        }

        Err(DccError::figma_api(
            Some(status),
            error_message(status, &body, retry_after.as_deref()),
        ))
    }
}

fn validate_file_key(file_key: &str) -> Result<()> {
    if file_key.trim().is_empty() || file_key.contains('/') {
        return Err(DccError::Config(format!(
            "Invalid Figma file key '{}'",
            file_key
        )));
    }
    Ok(())
}

fn error_message(status: StatusCode, body: &str, retry_after: Option<&str>) -> String {
    let fallback = format!("Figma API returned status {}", status.as_u16());
    let parsed = serde_json::from_str::<Value>(body).ok();
    let from_body = parsed
        .as_ref()
        .and_then(|value| value.get("err").or_else(|| value.get("error")))
        .and_then(Value::as_str)
        .map(str::to_owned);

    match (status, retry_after, from_body) {
        (StatusCode::TOO_MANY_REQUESTS, Some(retry), Some(msg)) => {
            format!("{msg} (rate limited, retry after {retry}s)")
        }
        (StatusCode::TOO_MANY_REQUESTS, Some(retry), None) => {
            format!("rate limited by Figma API, retry after {retry}s")
        }
        (_, _, Some(msg)) => msg,
        _ => fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn personal_access_token_sets_expected_header() {
        let client = Client::new();
        let request = FigmaAuth::PersonalAccessToken("secret".into())
            .apply(client.get("https://api.figma.com/v1/files/abc"))
            .build()
            .expect("build request");

        assert_eq!(request.headers().get("X-FIGMA-TOKEN").unwrap(), "secret");
    }

    #[test]
    fn oauth_token_sets_bearer_auth_header() {
        let client = Client::new();
        let request = FigmaAuth::OAuthToken("oauth_secret".into())
            .apply(client.get("https://api.figma.com/v1/files/abc"))
            .build()
            .expect("build request");

        let header = request
            .headers()
            .get(reqwest::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .unwrap();
        assert_eq!(header, "Bearer oauth_secret");
    }

    #[test]
    fn empty_token_is_a_config_error() {
        let err = FigmaClient::new(FigmaAuth::PersonalAccessToken("  ".into())).unwrap_err();
        assert!(matches!(err, DccError::Config(msg) if msg.contains("FIGMA_TOKEN")));
    }

    #[tokio::test]
    async fn fetch_nodes_rejects_empty_ids() {
        let client = FigmaClient::new(FigmaAuth::PersonalAccessToken("t".into())).unwrap();
        let result = client.fetch_nodes("ABC", &[]).await;
        assert!(matches!(result, Err(DccError::Config(_))));
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let client = FigmaClient::with_base_url_and_timeout(
            FigmaAuth::PersonalAccessToken("t".into()),
            "http://127.0.0.1:1",
            Duration::from_secs(2),
        )
        .unwrap();
        let result = client.fetch_file("ABC").await;
        assert!(
            matches!(result, Err(DccError::Network(_))),
            "expected network error, got {result:?}"
        );
    }

    #[test]
    fn rate_limit_message_includes_retry_after() {
        let msg = error_message(StatusCode::TOO_MANY_REQUESTS, "", Some("42"));
        assert_eq!(msg, "rate limited by Figma API, retry after 42s");

        let msg = error_message(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"status":429,"err":"Rate limit exceeded"}"#,
            Some("7"),
        );
        assert_eq!(msg, "Rate limit exceeded (rate limited, retry after 7s)");
    }

    #[test]
    fn error_message_prefers_body_then_status() {
        assert_eq!(
            error_message(StatusCode::FORBIDDEN, r#"{"err":"Invalid token"}"#, None),
            "Invalid token"
        );
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, "not json", None),
            "Figma API returned status 404"
        );
    }
}
