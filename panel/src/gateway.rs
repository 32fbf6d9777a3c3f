//! Authenticated request gateway
//!
//! Every outbound call to the reports API goes through [`Gateway::request`],
//! which attaches the session credential and owns the single policy for a
//! rejected credential: tear the session down, notify the navigator, and hand
//! the caller an [`Outcome::AuthExpired`] sentinel instead of the response.
//!
//! Header merge order is deterministic: caller-supplied headers are applied
//! first and the injected `Authorization` header is inserted last, so the
//! credential always wins over a caller-supplied header of the same name.
//! With no credential in the store the header is omitted entirely.
//!
//! Concurrent calls are independent. Two racing 401 responses both run the
//! invalidation path; deleting an absent key is a no-op, so the worst case is
//! a redundant navigator notification.

use crate::config::ApiConfig;
use crate::metrics;
use crate::session::SessionStore;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Method, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("session credential is not a valid header value")]
    InvalidCredential,
}

/// Navigation collaborator notified when the session is torn down
///
/// Production wiring logs the target and lets the page handler answer with a
/// real redirect; tests substitute a recording implementation.
pub trait Navigator: Send + Sync {
    /// The session ended; the UI should move to `entry` (the login entry page)
    fn to_entry(&self, entry: &str);
}

/// Default navigator: record the redirect target in the log
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn to_entry(&self, entry: &str) {
        warn!("Session expired, redirecting to {}", entry);
    }
}

/// Caller-owned request descriptor
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method, GET when not set
    pub method: Method,

    /// Extra headers, applied before the credential header
    pub headers: HeaderMap,

    /// Optional request payload
    pub body: Option<Vec<u8>>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: None,
        }
    }
}

/// Result of a gateway call
///
/// `AuthExpired` means the session was invalidated while handling this call;
/// the response must not be used and the caller must not proceed.
#[derive(Debug)]
pub enum Outcome {
    Response(Response),
    AuthExpired,
}

impl Outcome {
    /// The response, unless the session expired
    pub fn into_response(self) -> Option<Response> {
        match self {
            Outcome::Response(response) => Some(response),
            Outcome::AuthExpired => None,
        }
    }
}

/// Build the credential header set for a session token
pub fn auth_headers(token: &str) -> Result<HeaderMap, GatewayError> {
    let value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| GatewayError::InvalidCredential)?;
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

/// Authenticated gateway to the reports API
pub struct Gateway {
    http: Client,
    base_url: String,
    entry_path: String,
    store: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
}

impl Gateway {
    /// Create a gateway for the configured API
    pub fn new(
        config: &ApiConfig,
        entry_path: impl Into<String>,
        store: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            entry_path: entry_path.into(),
            store,
            navigator,
        })
    }

    /// Issue an authenticated request
    ///
    /// Returns the raw response for the caller to interpret, or
    /// [`Outcome::AuthExpired`] after tearing down the session on HTTP 401.
    /// Transport failures propagate unchanged; there is no retry.
    pub async fn request(
        &self,
        resource: &str,
        options: RequestOptions,
    ) -> Result<Outcome, GatewayError> {
        let counters = metrics::global();
        counters.gateway_requests.inc();
        let timer = counters.request_duration.start_timer();

        let mut headers = options.headers;
        if let Some(token) = self.store.token().await {
            // Injected credential always wins over a caller-supplied value
            for (name, value) in auth_headers(&token)?.iter() {
                headers.insert(name, value.clone());
            }
        }

        let mut request = self
            .http
            .request(options.method, self.resolve(resource))
            .headers(headers);
        if let Some(body) = options.body {
            request = request.body(body);
        }

        let response = request.send().await?;
        timer.observe_duration();

        if response.status() == StatusCode::UNAUTHORIZED {
            self.invalidate_session().await;
            return Ok(Outcome::AuthExpired);
        }

        Ok(Outcome::Response(response))
    }

    /// Resolve a base-relative path against the API base URL
    fn resolve(&self, resource: &str) -> String {
        if resource.starts_with("http://") || resource.starts_with("https://") {
            resource.to_string()
        } else if resource.starts_with('/') {
            format!("{}{}", self.base_url, resource)
        } else {
            format!("{}/{}", self.base_url, resource)
        }
    }

    /// Tear down the session after a credential rejection
    ///
    /// Never surfaces an error to the caller: a failed write of the session
    /// file is logged and the sentinel is still returned, since the in-memory
    /// credential is already gone.
    async fn invalidate_session(&self) {
        metrics::global().auth_invalidations.inc();
        if let Err(e) = self.store.invalidate().await {
            warn!("Failed to persist session invalidation: {}", e);
        }
        debug!("Credential rejected by the API");
        self.navigator.to_entry(&self.entry_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_headers_bearer_scheme() {
        let headers = auth_headers("abc").unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
    }

    #[test]
    fn test_auth_headers_reject_control_chars() {
        assert!(auth_headers("abc\ndef").is_err());
    }

    #[test]
    fn test_default_options_are_get() {
        let options = RequestOptions::default();
        assert_eq!(options.method, Method::GET);
        assert!(options.headers.is_empty());
        assert!(options.body.is_none());
    }

    #[tokio::test]
    async fn test_resolve_joins_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(
            crate::session::SessionStore::open(dir.path().join("session.json"))
                .await
                .unwrap(),
        );
        let config = ApiConfig {
            base_url: "http://api.test/".to_string(),
            timeout: 5,
        };
        let gateway = Gateway::new(&config, "/index.html", store, Arc::new(LogNavigator)).unwrap();

        assert_eq!(gateway.resolve("/stats/x"), "http://api.test/stats/x");
        assert_eq!(gateway.resolve("stats/x"), "http://api.test/stats/x");
        assert_eq!(gateway.resolve("https://other.test/y"), "https://other.test/y");
    }
}
