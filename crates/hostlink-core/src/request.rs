// ── Typed request structs for service operations ──
//
// Fields are optional so that absent or blank input is reported as
// `MissingField` by the service, before any I/O happens.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachRequest {
    pub project_id: Option<String>,
    pub deployment_url: Option<String>,
    pub domain: Option<String>,
}

impl AttachRequest {
    pub fn new(
        project_id: impl Into<String>,
        deployment_url: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            project_id: Some(project_id.into()),
            deployment_url: Some(deployment_url.into()),
            domain: Some(domain.into()),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub project_id: Option<String>,
    pub domain: Option<String>,
    /// Recompute the required record set from the current recommendation.
    #[serde(default)]
    pub replan: bool,
}

impl VerifyRequest {
    pub fn new(project_id: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            project_id: Some(project_id.into()),
            domain: Some(domain.into()),
            replan: false,
        }
    }

    #[must_use]
    pub fn with_replan(mut self, replan: bool) -> Self {
        self.replan = replan;
        self
    }
}

/// Point a custom domain at a specific platform deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasRequest {
    pub project_id: Option<String>,
    pub deployment_url: Option<String>,
    pub domain: Option<String>,
}

impl AliasRequest {
    pub fn new(
        project_id: impl Into<String>,
        deployment_url: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            project_id: Some(project_id.into()),
            deployment_url: Some(deployment_url.into()),
            domain: Some(domain.into()),
        }
    }
}

/// The trimmed value of a required field.
pub(crate) fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, CoreError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CoreError::missing(field))
}
