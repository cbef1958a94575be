// Deployment lookup and alias endpoints

use serde_json::json;
use tracing::debug;

use crate::client::ProviderClient;
use crate::error::Error;
use crate::models::{AliasResponse, Deployment};

impl ProviderClient {
    /// Look up a deployment by id or hostname.
    ///
    /// `GET /v13/deployments/{id_or_host}`
    pub async fn get_deployment(&self, id_or_host: &str) -> Result<Deployment, Error> {
        let url = self.endpoint(&["v13", "deployments", id_or_host])?;
        debug!(deployment = id_or_host, "fetching deployment");
        self.get(url).await
    }

    /// Point an alias (custom domain) at a specific deployment.
    ///
    /// `POST /v2/deployments/{id}/aliases` with `{"alias": domain}`
    pub async fn create_alias(
        &self,
        deployment_id: &str,
        alias: &str,
    ) -> Result<AliasResponse, Error> {
        let url = self.endpoint(&["v2", "deployments", deployment_id, "aliases"])?;
        debug!(deployment_id, alias, "creating alias");
        self.post(url, &json!({ "alias": alias })).await
    }
}
