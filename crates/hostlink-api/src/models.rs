// Provider wire models
//
// Field names follow the provider's camelCase JSON. Everything the core does
// not rely on is optional or defaulted so that additive API changes never
// break deserialization.

use serde::{Deserialize, Serialize};

// ── Project domains ─────────────────────────────────────────────────

/// A domain as attached to a provider project.
///
/// Returned by `POST /v9/projects/{project}/domains`, the verify endpoint,
/// and `GET /v9/projects/{project}/domains/{domain}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDomain {
    pub name: String,
    #[serde(default)]
    pub verified: bool,
    /// Outstanding ownership challenges. Empty once the domain is verified.
    #[serde(default)]
    pub verification: Vec<VerificationChallenge>,
    pub project_id: Option<String>,
    pub apex_name: Option<String>,
}

/// One ownership challenge issued by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VerificationChallenge {
    /// Record type, `"TXT"` for DNS ownership challenges.
    #[serde(rename = "type")]
    pub kind: String,
    /// Fully-qualified host the record must be created at.
    pub domain: String,
    pub value: String,
    pub reason: Option<String>,
}

impl VerificationChallenge {
    pub fn is_txt(&self) -> bool {
        self.kind.eq_ignore_ascii_case("TXT")
    }
}

/// The record the provider still expects when ownership verification fails.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExpectedRecord {
    pub name: String,
    pub value: String,
}

/// Result of `POST /v9/projects/{project}/domains/{domain}/verify`.
///
/// The provider reports an outstanding TXT challenge as a 4xx error body;
/// that case is lifted into its own variant so callers match on it instead
/// of probing error codes.
#[derive(Debug, Clone)]
pub enum VerifyResponse {
    /// 2xx response. Inspect `verified` on the payload.
    Checked(ProjectDomain),
    /// `missing_txt_record`: the TXT record that must be created first.
    MissingTxtRecord(ExpectedRecord),
    /// Any other 4xx verification failure.
    Failed { code: String, message: String },
}

// ── Error envelope ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
    pub record: Option<ExpectedRecord>,
    #[serde(default)]
    pub verification: Vec<VerificationChallenge>,
}

// ── DNS configuration ───────────────────────────────────────────────

fn default_misconfigured() -> bool {
    true
}

/// `GET /v6/domains/{domain}/config`
///
/// `misconfigured` defaults to `true` when absent: routing only counts as
/// verified when the provider explicitly says it is not misconfigured.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainConfig {
    #[serde(default = "default_misconfigured")]
    pub misconfigured: bool,
    #[serde(default, rename = "recommendedIPv4")]
    pub recommended_ipv4: Vec<RecommendedIpv4>,
    #[serde(default, rename = "recommendedCNAME")]
    pub recommended_cname: Vec<RecommendedCname>,
    /// A record values currently resolved for the domain.
    #[serde(default)]
    pub a_values: Vec<String>,
    /// CNAME targets currently resolved for the domain.
    #[serde(default)]
    pub cnames: Vec<String>,
    pub configured_by: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecommendedIpv4 {
    #[serde(default)]
    pub rank: u32,
    #[serde(default)]
    pub value: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecommendedCname {
    #[serde(default)]
    pub rank: u32,
    pub value: String,
}

// ── Deployments ─────────────────────────────────────────────────────

/// `GET /v13/deployments/{host}`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub id: String,
    pub url: String,
    pub name: Option<String>,
    pub project_id: Option<String>,
}

/// `POST /v2/deployments/{id}/aliases`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasResponse {
    pub alias: String,
    pub uid: String,
    pub created: Option<String>,
    pub old_deployment_id: Option<String>,
}
