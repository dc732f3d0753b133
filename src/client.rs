use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::Secrets;
use crate::error::{RelayError, Result};
use crate::types::{ContractMetadata, Trace};

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// HTTP client for the trace provider: execution traces and per-contract
/// metadata. One instance per invocation; no retries, a failed request is
/// reported to the caller.
pub struct TraceApiClient {
    client: Client,
    base_url: String,
    bearer: String,
    account_slug: String,
    project_slug: String,
}

#[derive(Debug, Deserialize)]
struct ContractResponse {
    contract: ContractBody,
}

#[derive(Debug, Deserialize)]
struct ContractBody {
    contract_name: Option<String>,
    data: Option<ContractData>,
}

#[derive(Debug, Deserialize)]
struct ContractData {
    abi: Option<Value>,
}

impl TraceApiClient {
    pub fn new(secrets: &Secrets) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: secrets.api_base_url.trim_end_matches('/').to_string(),
            bearer: secrets.bearer.clone(),
            account_slug: secrets.account_slug.clone(),
            project_slug: secrets.project_slug.clone(),
        }
    }

    /// Fetch the decoded execution trace for one transaction.
    pub async fn fetch_trace(&self, network: &str, hash: &str) -> Result<Trace> {
        let url = format!("{}/public-contract/{}/trace/{}", self.base_url, network, hash);

        debug!("Fetching trace from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("authorization", &self.bearer)
            .send()
            .await
            .map_err(|e| RelayError::TraceFetch(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(RelayError::TraceFetch(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| RelayError::TraceFetch(format!("Failed to parse trace response: {}", e)))?;

        Trace::from_body(body)
    }

    /// Resolve the contract name and ABI for one address.
    pub async fn fetch_contract_metadata(
        &self,
        network: &str,
        address: &str,
    ) -> Result<ContractMetadata> {
        let url = format!(
            "{}/account/{}/project/{}/contract/{}/{}",
            self.base_url, self.account_slug, self.project_slug, network, address
        );

        debug!("Fetching contract metadata for: {}", address);

        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.bearer)
            .send()
            .await
            .map_err(|e| RelayError::MetadataFetch(format!("Request failed for {}: {}", address, e)))?;

        if !response.status().is_success() {
            return Err(RelayError::MetadataFetch(format!(
                "HTTP error for {}: {}",
                address,
                response.status()
            )));
        }

        let contract: ContractResponse = response.json().await.map_err(|e| {
            RelayError::MetadataFetch(format!(
                "Failed to parse contract response for {}: {}",
                address, e
            ))
        })?;

        Ok(ContractMetadata {
            name: contract.contract.contract_name,
            abi: contract.contract.data.and_then(|data| data.abi),
        })
    }
}
