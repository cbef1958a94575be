// ── Domain provider abstraction ──
//
// The service talks to the hosting provider only through `DomainProvider`.
// Responses are sum types so callers match every case; the concrete
// implementation for `hostlink_api::ProviderClient` lives at the bottom.

use async_trait::async_trait;
use hostlink_api::{DomainConfig, ProjectDomain, ProviderClient, VerifyResponse};
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::model::{Hostname, ObservedRecords};
use crate::plan::{OwnershipChallenge, RoutingRecommendation};

/// Result of registering a domain with a provider project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub verified: bool,
    /// Outstanding TXT challenges, empty once ownership is proven.
    pub challenges: Vec<OwnershipChallenge>,
}

/// Result of asking the provider to re-check ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnershipResult {
    Verified,
    Unverified { reason: String },
    /// The TXT record the provider is still waiting for.
    MissingChallenge(OwnershipChallenge),
}

/// The provider's view of a domain's DNS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsConfig {
    pub misconfigured: bool,
    pub recommendation: RoutingRecommendation,
    pub current: ObservedRecords,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRef {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasRef {
    pub alias: String,
    pub uid: String,
}

#[async_trait]
pub trait DomainProvider: Send + Sync {
    /// Attach `domain` to provider project `project`. Re-registering a domain
    /// the project already holds is not an error.
    async fn register_domain(
        &self,
        project: &str,
        domain: &Hostname,
    ) -> Result<Registration, CoreError>;

    async fn verify_ownership(
        &self,
        project: &str,
        domain: &Hostname,
    ) -> Result<OwnershipResult, CoreError>;

    async fn fetch_dns_config(&self, domain: &Hostname) -> Result<DnsConfig, CoreError>;

    async fn resolve_deployment(&self, host: &str) -> Result<DeploymentRef, CoreError>;

    async fn create_alias(
        &self,
        deployment_id: &str,
        domain: &Hostname,
    ) -> Result<AliasRef, CoreError>;
}

// ── Wire → domain conversions ────────────────────────────────────────

impl From<&ProjectDomain> for Registration {
    fn from(domain: &ProjectDomain) -> Self {
        Self {
            verified: domain.verified,
            challenges: domain
                .verification
                .iter()
                .filter(|c| c.is_txt())
                .map(|c| OwnershipChallenge {
                    host: c.domain.clone(),
                    value: c.value.clone(),
                })
                .collect(),
        }
    }
}

impl From<&DomainConfig> for RoutingRecommendation {
    /// IPv4 groups ordered by rank (ties keep provider order) and flattened
    /// without duplicates; the lowest-rank CNAME wins.
    fn from(config: &DomainConfig) -> Self {
        let mut groups: Vec<_> = config.recommended_ipv4.iter().collect();
        groups.sort_by_key(|g| g.rank);

        let mut apex_ips: Vec<String> = Vec::new();
        for ip in groups.into_iter().flat_map(|g| &g.value) {
            if !apex_ips.contains(ip) {
                apex_ips.push(ip.clone());
            }
        }

        let cname_target = config
            .recommended_cname
            .iter()
            .min_by_key(|c| c.rank)
            .map(|c| c.value.clone());

        Self {
            apex_ips,
            cname_target,
        }
    }
}

impl From<DomainConfig> for DnsConfig {
    fn from(config: DomainConfig) -> Self {
        let recommendation = RoutingRecommendation::from(&config);
        Self {
            misconfigured: config.misconfigured,
            recommendation,
            current: ObservedRecords {
                a_values: config.a_values,
                cnames: config.cnames,
            },
        }
    }
}

// ── ProviderClient implementation ────────────────────────────────────

#[async_trait]
impl DomainProvider for ProviderClient {
    async fn register_domain(
        &self,
        project: &str,
        domain: &Hostname,
    ) -> Result<Registration, CoreError> {
        let attached = match self.add_project_domain(project, domain.as_str()).await {
            Ok(d) => d,
            Err(e) if e.is_conflict() => {
                debug!(project, %domain, "domain already registered, fetching existing attachment");
                self.get_project_domain(project, domain.as_str())
                    .await
                    .map_err(|_| e)?
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Registration::from(&attached))
    }

    async fn verify_ownership(
        &self,
        project: &str,
        domain: &Hostname,
    ) -> Result<OwnershipResult, CoreError> {
        let result = match self.verify_project_domain(project, domain.as_str()).await? {
            VerifyResponse::Checked(d) if d.verified => OwnershipResult::Verified,
            VerifyResponse::Checked(d) => OwnershipResult::Unverified {
                reason: d
                    .verification
                    .iter()
                    .find_map(|c| c.reason.clone())
                    .unwrap_or_else(|| "pending_domain_verification".into()),
            },
            VerifyResponse::MissingTxtRecord(record) => {
                OwnershipResult::MissingChallenge(OwnershipChallenge {
                    host: record.name,
                    value: record.value,
                })
            }
            VerifyResponse::Failed { code, message } => {
                warn!(project, %domain, code = %code, "ownership verification rejected: {message}");
                OwnershipResult::Unverified { reason: message }
            }
        };
        Ok(result)
    }

    async fn fetch_dns_config(&self, domain: &Hostname) -> Result<DnsConfig, CoreError> {
        Ok(self.get_domain_config(domain.as_str()).await?.into())
    }

    async fn resolve_deployment(&self, host: &str) -> Result<DeploymentRef, CoreError> {
        let deployment = self.get_deployment(host).await?;
        Ok(DeploymentRef {
            id: deployment.id,
            url: deployment.url,
        })
    }

    async fn create_alias(
        &self,
        deployment_id: &str,
        domain: &Hostname,
    ) -> Result<AliasRef, CoreError> {
        let alias = ProviderClient::create_alias(self, deployment_id, domain.as_str()).await?;
        Ok(AliasRef {
            alias: alias.alias,
            uid: alias.uid,
        })
    }
}
