//! Compute Engine machine-type catalog client
//!
//! Paginated client over `compute.googleapis.com`, implementing the
//! `MachineTypeCatalog` seam used by compatibility validation.

use crate::error::{GkeccError, Result};
use crate::validate::{MachineType, MachineTypeCatalog};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

const DEFAULT_BASE_URL: &str = "https://compute.googleapis.com";

pub struct ComputeClient {
    http: reqwest::Client,
    token: String,
    base_url: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MachineTypeListResponse {
    #[serde(default)]
    items: Vec<MachineTypeItem>,
    #[serde(default)]
    next_page_token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MachineTypeItem {
    name: String,
    #[serde(default)]
    guest_cpus: u32,
    #[serde(default)]
    memory_mb: u64,
}

impl ComputeClient {
    pub fn new(token: String) -> Self {
        Self::with_base_url(token, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(token: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
            base_url,
        }
    }
}

#[async_trait]
impl MachineTypeCatalog for ComputeClient {
    async fn list_machine_types(&self, project: &str, zone: &str) -> Result<Vec<MachineType>> {
        let mut machine_types = Vec::new();
        let mut page_token = String::new();

        loop {
            let url = format!(
                "{}/compute/v1/projects/{}/zones/{}/machineTypes?pageToken={}",
                self.base_url, project, zone, page_token
            );
            let page: MachineTypeListResponse = self
                .http
                .get(&url)
                .bearer_auth(&self.token)
                .send()
                .await
                .map_err(|e| GkeccError::catalog("machine type catalog unreachable", e))?
                .error_for_status()
                .map_err(|e| GkeccError::catalog("machine type listing failed", e))?
                .json()
                .await
                .map_err(|e| GkeccError::catalog("invalid machine type response", e))?;

            machine_types.extend(page.items.into_iter().map(|item| MachineType {
                name: item.name,
                guest_cpus: item.guest_cpus,
                memory_mb: item.memory_mb,
            }));

            page_token = page.next_page_token;
            if page_token.is_empty() {
                break;
            }
        }

        debug!("listed {} machine types in {}", machine_types.len(), zone);
        Ok(machine_types)
    }
}
