// Project domain and DNS configuration endpoints
//
// Registration and verification are project-scoped (`/v9/projects/...`),
// DNS configuration is domain-scoped (`/v6/domains/...`).

use serde_json::json;
use tracing::{debug, warn};

use crate::client::ProviderClient;
use crate::error::Error;
use crate::models::{
    DomainConfig, ErrorEnvelope, ExpectedRecord, ProjectDomain, VerificationChallenge,
    VerifyResponse,
};

/// Error code the provider uses when the ownership TXT record is absent.
pub const MISSING_TXT_RECORD: &str = "missing_txt_record";

impl ProviderClient {
    /// Attach a domain to a project.
    ///
    /// `POST /v9/projects/{project}/domains` with `{"name": domain}`
    pub async fn add_project_domain(
        &self,
        project: &str,
        domain: &str,
    ) -> Result<ProjectDomain, Error> {
        let url = self.endpoint(&["v9", "projects", project, "domains"])?;
        debug!(project, domain, "adding project domain");
        self.post(url, &json!({ "name": domain })).await
    }

    /// Fetch a domain already attached to a project.
    ///
    /// `GET /v9/projects/{project}/domains/{domain}`
    pub async fn get_project_domain(
        &self,
        project: &str,
        domain: &str,
    ) -> Result<ProjectDomain, Error> {
        let url = self.endpoint(&["v9", "projects", project, "domains", domain])?;
        debug!(project, domain, "fetching project domain");
        self.get(url).await
    }

    /// Ask the provider to re-check the ownership challenge.
    ///
    /// `POST /v9/projects/{project}/domains/{domain}/verify`
    ///
    /// A `missing_txt_record` error body is returned as
    /// [`VerifyResponse::MissingTxtRecord`]; other 4xx verification failures
    /// become [`VerifyResponse::Failed`]. Auth, not-found, throttling, and
    /// server errors stay errors.
    pub async fn verify_project_domain(
        &self,
        project: &str,
        domain: &str,
    ) -> Result<VerifyResponse, Error> {
        let url = self.endpoint(&["v9", "projects", project, "domains", domain, "verify"])?;
        debug!(project, domain, "verifying domain ownership");

        let resp = self.post_raw(url).await?;
        let status = resp.status();

        if status.is_success() {
            return Self::decode(resp).await.map(VerifyResponse::Checked);
        }
        if !status.is_client_error() || matches!(status.as_u16(), 401 | 403 | 404 | 429) {
            return Err(Self::error_from_response(resp).await);
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(&body) else {
            return Err(Self::error_for_status(status, None, &body));
        };

        let error = envelope.error;
        let code = error.code.unwrap_or_default();

        if code == MISSING_TXT_RECORD {
            let expected = error.record.or_else(|| {
                error
                    .verification
                    .into_iter()
                    .find(VerificationChallenge::is_txt)
                    .map(|c| ExpectedRecord {
                        name: c.domain,
                        value: c.value,
                    })
            });
            if let Some(expected) = expected {
                return Ok(VerifyResponse::MissingTxtRecord(expected));
            }
            warn!(project, domain, "missing_txt_record without an expected record");
        }

        Ok(VerifyResponse::Failed {
            message: error.message.unwrap_or_else(|| format!("HTTP {status}")),
            code,
        })
    }

    /// Fetch the provider's view of the domain's DNS configuration.
    ///
    /// `GET /v6/domains/{domain}/config`
    pub async fn get_domain_config(&self, domain: &str) -> Result<DomainConfig, Error> {
        let url = self.endpoint(&["v6", "domains", domain, "config"])?;
        debug!(domain, "fetching domain config");
        self.get(url).await
    }
}
