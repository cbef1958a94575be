// Provider API HTTP client
//
// Wraps `reqwest::Client` with bearer auth, team-scoped URL construction,
// and status-code classification. Endpoint groups (domains, deployments)
// are implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue, RETRY_AFTER};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::ErrorEnvelope;
use crate::transport::TransportConfig;

/// Retry-after used when a 429 carries no usable `Retry-After` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Longest body excerpt carried in error messages.
const BODY_PREVIEW_CHARS: usize = 200;

/// Raw HTTP client for the domain provider's REST API.
///
/// Every request carries the bearer token configured at construction, and
/// every URL gets a `teamId` query parameter when a team is configured.
/// Non-2xx responses are classified into [`Error`] variants before the
/// caller sees them.
pub struct ProviderClient {
    http: reqwest::Client,
    base_url: Url,
    team_id: Option<String>,
    timeout_secs: u64,
}

impl ProviderClient {
    /// Create a client that authenticates with `token`.
    ///
    /// `base_url` is the API root (e.g. `https://api.vercel.com`).
    pub fn new(
        base_url: Url,
        token: &SecretString,
        team_id: Option<String>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|e| Error::Client(format!("token is not a valid header value: {e}")))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = transport.build_client_with_headers(headers)?;
        Ok(Self {
            http,
            base_url,
            team_id,
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    ///
    /// No auth header is added; used by tests and by callers that inject
    /// their own middleware.
    pub fn from_reqwest(
        base_url: &str,
        http: reqwest::Client,
        team_id: Option<String>,
    ) -> Result<Self, Error> {
        let base_url = Url::parse(base_url)?;
        Ok(Self {
            http,
            base_url,
            team_id,
            timeout_secs: TransportConfig::default().timeout_secs(),
        })
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The team scope appended to every request, if any.
    pub fn team_id(&self) -> Option<&str> {
        self.team_id.as_deref()
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/{segments...}?teamId={team}`.
    ///
    /// Segments are percent-encoded individually, so hostnames and
    /// identifiers can be passed through unchanged.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Client(format!("base URL cannot carry a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);

        if let Some(team) = &self.team_id {
            url.query_pairs_mut().append_pair("teamId", team);
        }
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode a 2xx JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);
        let resp = self.send(self.http.get(url)).await?;
        Self::decode(resp).await
    }

    /// Send a POST request with a JSON body and decode a 2xx JSON body.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        debug!("POST {}", url);
        let resp = self.send(self.http.post(url).json(body)).await?;
        Self::decode(resp).await
    }

    /// Send a body-less POST and hand back the raw response.
    ///
    /// For endpoints whose error bodies carry data the caller needs.
    pub(crate) async fn post_raw(&self, url: Url) -> Result<reqwest::Response, Error> {
        debug!("POST {}", url);
        self.send(self.http.post(url)).await
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        builder.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_secs: self.timeout_secs,
                }
            } else {
                Error::Transport(e)
            }
        })
    }

    /// Decode a successful response, or classify a failed one.
    pub(crate) async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::error_from_response(resp).await);
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(%status, len = body.len(), "response body received");

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }

    /// Consume a non-2xx response into an [`Error`].
    pub(crate) async fn error_from_response(resp: reqwest::Response) -> Error {
        let status = resp.status();
        let retry_after = resp
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        let body = resp.text().await.unwrap_or_default();
        Self::error_for_status(status, retry_after, &body)
    }

    /// Map a status code plus error body to an [`Error`] variant.
    pub(crate) fn error_for_status(status: StatusCode, retry_after: Option<u64>, body: &str) -> Error {
        let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
        let code = envelope.as_ref().and_then(|e| e.error.code.clone());
        let message = envelope
            .and_then(|e| e.error.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    preview(body)
                }
            });

        match status.as_u16() {
            401 | 403 => Error::Unauthorized { message },
            404 => Error::NotFound { message },
            429 => Error::RateLimited {
                retry_after_secs: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
            },
            s if s >= 500 => Error::Server { status: s, message },
            s => Error::Api {
                status: s,
                code,
                message,
            },
        }
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(team: Option<&str>) -> ProviderClient {
        ProviderClient::from_reqwest(
            "https://api.example.test",
            reqwest::Client::new(),
            team.map(String::from),
        )
        .unwrap()
    }

    #[test]
    fn endpoint_appends_team_scope() {
        let url = client(Some("team_123"))
            .endpoint(&["v6", "domains", "example.com", "config"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.test/v6/domains/example.com/config?teamId=team_123"
        );
    }

    #[test]
    fn endpoint_without_team_has_no_query() {
        let url = client(None)
            .endpoint(&["v13", "deployments", "app-x1.vercel.app"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.example.test/v13/deployments/app-x1.vercel.app"
        );
    }

    #[test]
    fn status_mapping() {
        let body = r#"{"error":{"code":"forbidden","message":"Not authorized"}}"#;
        assert!(matches!(
            ProviderClient::error_for_status(StatusCode::FORBIDDEN, None, body),
            Error::Unauthorized { message } if message == "Not authorized"
        ));
        assert!(matches!(
            ProviderClient::error_for_status(StatusCode::TOO_MANY_REQUESTS, None, ""),
            Error::RateLimited { retry_after_secs: 60 }
        ));
        assert!(matches!(
            ProviderClient::error_for_status(StatusCode::TOO_MANY_REQUESTS, Some(7), ""),
            Error::RateLimited { retry_after_secs: 7 }
        ));
        assert!(matches!(
            ProviderClient::error_for_status(StatusCode::BAD_GATEWAY, None, ""),
            Error::Server { status: 502, .. }
        ));

        let conflict = r#"{"error":{"code":"domain_already_in_use","message":"taken"}}"#;
        let err = ProviderClient::error_for_status(StatusCode::CONFLICT, None, conflict);
        assert!(err.is_conflict());
        assert_eq!(err.api_error_code(), Some("domain_already_in_use"));
    }

    #[test]
    fn error_message_falls_back_to_body_preview() {
        let long = "x".repeat(500);
        let Error::Api { message, code, .. } =
            ProviderClient::error_for_status(StatusCode::BAD_REQUEST, None, &long)
        else {
            panic!("expected Api error");
        };
        assert_eq!(message.len(), BODY_PREVIEW_CHARS);
        assert!(code.is_none());
    }
}
