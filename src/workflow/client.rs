use anyhow::{bail, Context, Result};
use serde_json::Value;

use super::http::{http_get, http_post};
use super::types::{ApiEnvelope, UpdateEndpoint, STATUS_SUCCESS};
use crate::checklist::{ActorRecord, EntityTaxonomy};

const SERVICE: &str = "Workflow";

/// Client for the workflow admin API.
///
/// Actors and workflow documents live on `base_url`; entity lookups and
/// updates go to `entity_base_url`.
#[derive(Debug, Clone)]
pub struct WorkflowClient {
    client: reqwest::Client,
    base_url: String,
    entity_base_url: String,
}

impl WorkflowClient {
    pub fn new(base_url: &str, entity_base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            entity_base_url: entity_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the actor directory.
    pub async fn fetch_actors(&self) -> Result<Vec<ActorRecord>> {
        let url = format!("{}/Actors", self.base_url);
        let envelope: ApiEnvelope<Vec<ActorRecord>> = http_get(&self.client, &url, SERVICE).await?;
        let actors = envelope.into_data("actors")?;
        tracing::debug!("Fetched {} actors", actors.len());
        Ok(actors)
    }

    /// Fetch a whole workflow document (`data` of the envelope).
    pub async fn fetch_workflow(&self, workflow: &str) -> Result<Value> {
        let url = format!(
            "{}/Workflows/{}",
            self.base_url,
            urlencoding::encode(workflow)
        );
        let envelope: ApiEnvelope<Value> = http_get(&self.client, &url, SERVICE).await?;
        envelope.into_data("workflow")
    }

    /// Fetch one step of a workflow. `None` when the workflow has no such step.
    pub async fn fetch_step(&self, workflow: &str, step: &str) -> Result<Option<Value>> {
        let data = self.fetch_workflow(workflow).await?;
        Ok(data.get(step).filter(|v| !v.is_null()).cloned())
    }

    /// Fetch the entity types and objects available to a step.
    pub async fn fetch_entities(&self, workflow: &str, step: &str) -> Result<EntityTaxonomy> {
        let url = format!(
            "{}/Workflows/{}/entity/{}",
            self.entity_base_url,
            urlencoding::encode(workflow),
            urlencoding::encode(step)
        );
        let envelope: ApiEnvelope<Value> = http_get(&self.client, &url, SERVICE).await?;
        let data = envelope.into_data("entities")?;
        let Some(entities) = data.get("entities") else {
            bail!("Invalid entity data structure: missing 'entities'");
        };
        let taxonomy = EntityTaxonomy::from_json(entities);
        tracing::debug!(
            "Fetched {} entity types for {}/{}",
            taxonomy.types.len(),
            workflow,
            step
        );
        Ok(taxonomy)
    }

    /// POST a serialized step payload to the update route.
    pub async fn publish(
        &self,
        workflow: &str,
        payload: &Value,
        endpoint: UpdateEndpoint,
    ) -> Result<()> {
        let url = format!(
            "{}/Workflows/{}/{}",
            self.entity_base_url,
            endpoint.path_segment(),
            urlencoding::encode(workflow)
        );
        let response = http_post(&self.client, &url, payload, SERVICE).await?;

        if let Some(status) = response.get("status").and_then(Value::as_str) {
            if status != STATUS_SUCCESS {
                let message = response
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or("no message");
                bail!("Publish rejected: status '{}' ({})", status, message);
            }
        }

        tracing::info!("Published workflow {} via {}", workflow, endpoint.path_segment());
        Ok(())
    }
}
