// ── Domain attachment service ──
//
// Orchestrates one request at a time: normalize input, talk to the provider,
// run the pure classify/plan/reduce steps, and commit the result with a
// single store call. Holds only shared handles, so one instance serves
// concurrent requests.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classify::{DomainClass, classify};
use crate::config::ServiceOptions;
use crate::error::CoreError;
use crate::model::record::now;
use crate::model::{
    AttachmentState, DeploymentHost, DnsRecord, DomainRecord, DomainView, Hostname,
    ObservedRecords, VerificationStatus, VerificationUpdate,
};
use crate::plan::{OwnershipChallenge, challenges_in, plan};
use crate::provider::{DomainProvider, OwnershipResult};
use crate::reduce::{OwnershipCheck, RoutingCheck, reduce};
use crate::request::{AliasRequest, AttachRequest, VerifyRequest, required};
use crate::store::DomainStore;

// ── Outcomes ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachOutcome {
    pub project_id: String,
    pub project_name: String,
    pub domain: String,
    pub classification: DomainClass,
    pub required_dns: Vec<DnsRecord>,
    pub status: VerificationStatus,
    pub state: AttachmentState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(
    tag = "outcome",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum VerifyOutcome {
    /// Both checks ran and the result was committed.
    Checked {
        project_id: String,
        domain: String,
        status: VerificationStatus,
        state: AttachmentState,
        /// What the provider currently resolves for the domain.
        current_records: ObservedRecords,
        /// Fresh plan, present when replanning was requested.
        #[serde(skip_serializing_if = "Option::is_none")]
        required_dns: Option<Vec<DnsRecord>>,
    },
    /// The provider is still waiting for the ownership TXT record.
    MissingOwnershipRecord {
        project_id: String,
        domain: String,
        required: DnsRecord,
        status: VerificationStatus,
        state: AttachmentState,
    },
}

impl VerifyOutcome {
    pub fn status(&self) -> VerificationStatus {
        match self {
            Self::Checked { status, .. } | Self::MissingOwnershipRecord { status, .. } => *status,
        }
    }

    pub fn state(&self) -> AttachmentState {
        match self {
            Self::Checked { state, .. } | Self::MissingOwnershipRecord { state, .. } => *state,
        }
    }

    pub fn domain(&self) -> &str {
        match self {
            Self::Checked { domain, .. } | Self::MissingOwnershipRecord { domain, .. } => domain,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AliasOutcome {
    pub project_id: String,
    pub alias: String,
    pub alias_uid: String,
    pub deployment_id: String,
    pub deployment_url: String,
}

// ── Service ─────────────────────────────────────────────────────────

pub struct DomainAttachmentService {
    provider: Option<Arc<dyn DomainProvider>>,
    store: Arc<dyn DomainStore>,
    options: ServiceOptions,
}

impl DomainAttachmentService {
    pub fn new(provider: Arc<dyn DomainProvider>, store: Arc<dyn DomainStore>) -> Self {
        Self {
            provider: Some(provider),
            store,
            options: ServiceOptions::default(),
        }
    }

    /// A service that can only read stored records.
    pub fn read_only(store: Arc<dyn DomainStore>) -> Self {
        Self {
            provider: None,
            store,
            options: ServiceOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ServiceOptions) -> Self {
        self.options = options;
        self
    }

    fn provider(&self) -> Result<&dyn DomainProvider, CoreError> {
        self.provider.as_deref().ok_or_else(|| CoreError::Config {
            message: "no provider credentials configured for this operation".into(),
        })
    }

    /// Register a domain for a project and record what DNS it needs.
    pub async fn attach(&self, request: AttachRequest) -> Result<AttachOutcome, CoreError> {
        let AttachRequest {
            project_id,
            deployment_url,
            domain,
        } = request;
        let project_id = required(project_id.as_deref(), "projectId")?;
        let deployment_url = required(deployment_url.as_deref(), "deploymentUrl")?;
        let raw_domain = required(domain.as_deref(), "domain")?;

        let domain = Hostname::parse(raw_domain)?;
        let class = classify(&domain)?;
        let deployment = DeploymentHost::parse(deployment_url)?;
        let project_name = deployment.project_name().to_owned();
        let provider = self.provider()?;

        debug!(project_id, %domain, %class, project_name = %project_name, "attaching domain");
        let registration = provider.register_domain(&project_name, &domain).await?;
        let dns = provider.fetch_dns_config(&domain).await?;

        let required_dns = plan(&class, &registration.challenges, &dns.recommendation);
        let status = reduce(
            OwnershipCheck {
                verified: registration.verified,
            },
            RoutingCheck {
                misconfigured: dns.misconfigured,
            },
        );

        let timestamp = now();
        let stored = self
            .store
            .upsert(DomainRecord {
                project_id: project_id.to_owned(),
                project_name,
                deployment_url: deployment_url.to_owned(),
                custom_domain: domain.to_string(),
                required_dns,
                status,
                created_at: timestamp,
                updated_at: timestamp,
            })
            .await?;

        info!(
            project_id,
            %domain,
            state = %stored.state(),
            records = stored.required_dns.len(),
            "domain attached"
        );

        Ok(AttachOutcome {
            state: stored.state(),
            project_id: stored.project_id,
            project_name: stored.project_name,
            domain: stored.custom_domain,
            classification: class,
            required_dns: stored.required_dns,
            status: stored.status,
        })
    }

    /// Re-check ownership and routing and commit the fresh status.
    pub async fn verify(&self, request: VerifyRequest) -> Result<VerifyOutcome, CoreError> {
        let VerifyRequest {
            project_id,
            domain,
            replan,
        } = request;
        let project_id = required(project_id.as_deref(), "projectId")?;
        let raw_domain = required(domain.as_deref(), "domain")?;

        let domain = Hostname::parse(raw_domain)?;
        let class = classify(&domain)?;
        let provider = self.provider()?;

        let record = self
            .store
            .get(project_id)
            .await?
            .ok_or_else(|| CoreError::NotAttached {
                project_id: project_id.to_owned(),
            })?;
        if record.custom_domain != domain.as_str() {
            return Err(CoreError::DomainMismatch {
                project_id: project_id.to_owned(),
                stored: record.custom_domain,
                requested: domain.to_string(),
            });
        }

        let ownership_verified = match provider
            .verify_ownership(&record.project_name, &domain)
            .await?
        {
            OwnershipResult::Verified => true,
            OwnershipResult::Unverified { reason } => {
                debug!(project_id, %domain, reason = %reason, "ownership not yet verified");
                false
            }
            OwnershipResult::MissingChallenge(challenge) => {
                return self.missing_challenge(project_id, &domain, challenge).await;
            }
        };

        let dns = provider.fetch_dns_config(&domain).await?;
        let status = reduce(
            OwnershipCheck {
                verified: ownership_verified,
            },
            RoutingCheck {
                misconfigured: dns.misconfigured,
            },
        );

        let replanned = replan.then(|| {
            let challenges = if status.ownership_verified() {
                Vec::new()
            } else {
                challenges_in(&record.required_dns)
            };
            plan(&class, &challenges, &dns.recommendation)
        });

        let update = VerificationUpdate {
            ownership_verified: status.ownership_verified(),
            routing_verified: Some(status.routing_verified()),
            required_dns: replanned.clone(),
            updated_at: now(),
        };
        let stored = self.commit(project_id, &domain, update).await?;

        if stored.state() != record.state() {
            info!(
                project_id,
                %domain,
                from = %record.state(),
                to = %stored.state(),
                "verification state changed"
            );
        }

        Ok(VerifyOutcome::Checked {
            project_id: project_id.to_owned(),
            domain: domain.to_string(),
            status: stored.status,
            state: stored.state(),
            current_records: dns.current,
            required_dns: replanned,
        })
    }

    /// Early exit of `verify`: ownership drops to false, routing stays as
    /// stored, and the missing TXT record is handed back.
    async fn missing_challenge(
        &self,
        project_id: &str,
        domain: &Hostname,
        challenge: OwnershipChallenge,
    ) -> Result<VerifyOutcome, CoreError> {
        let update = VerificationUpdate {
            ownership_verified: false,
            routing_verified: None,
            required_dns: None,
            updated_at: now(),
        };
        let stored = self.commit(project_id, domain, update).await?;
        warn!(project_id, %domain, host = %challenge.host, "ownership TXT record missing");

        Ok(VerifyOutcome::MissingOwnershipRecord {
            project_id: project_id.to_owned(),
            domain: domain.to_string(),
            required: DnsRecord::txt(challenge.host, challenge.value),
            status: stored.status,
            state: stored.state(),
        })
    }

    async fn commit(
        &self,
        project_id: &str,
        domain: &Hostname,
        update: VerificationUpdate,
    ) -> Result<DomainRecord, CoreError> {
        self.store
            .update_verification(project_id, domain.as_str(), update)
            .await?
            .ok_or_else(|| CoreError::NotAttached {
                project_id: project_id.to_owned(),
            })
    }

    pub async fn get(&self, project_id: &str) -> Result<Option<DomainView>, CoreError> {
        let project_id = required(Some(project_id), "projectId")?;
        Ok(self.store.get(project_id).await?.map(DomainView::from))
    }

    /// Every stored attachment, ordered by project id.
    pub async fn list(&self) -> Result<Vec<DomainView>, CoreError> {
        Ok(self
            .store
            .list()
            .await?
            .into_iter()
            .map(DomainView::from)
            .collect())
    }

    /// Point the custom domain at a specific platform deployment.
    pub async fn alias(&self, request: AliasRequest) -> Result<AliasOutcome, CoreError> {
        let AliasRequest {
            project_id,
            deployment_url,
            domain,
        } = request;
        let project_id = required(project_id.as_deref(), "projectId")?;
        let deployment_url = required(deployment_url.as_deref(), "deploymentUrl")?;
        let raw_domain = required(domain.as_deref(), "domain")?;

        let domain = Hostname::parse(raw_domain)?;
        let host = DeploymentHost::parse(deployment_url)?;
        host.require_platform_suffix(&self.options.deployment_suffix)?;
        let provider = self.provider()?;

        let deployment = provider.resolve_deployment(host.as_str()).await?;
        let alias = provider.create_alias(&deployment.id, &domain).await?;
        info!(project_id, %domain, deployment_id = %deployment.id, "alias created");

        Ok(AliasOutcome {
            project_id: project_id.to_owned(),
            alias: alias.alias,
            alias_uid: alias.uid,
            deployment_id: deployment.id,
            deployment_url: deployment.url,
        })
    }
}
