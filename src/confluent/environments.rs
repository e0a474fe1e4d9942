//! Confluent Cloud Environments

use super::client::{Api, ConfluentClient};

/// List the IDs of all environments in the organization.
/// A failed listing yields no environments.
pub async fn list_environment_ids(client: &ConfluentClient) -> Vec<String> {
    let url = client.environments_url();

    match client.get_collection(Api::ControlPlane, &url).await {
        Ok(items) => items
            .iter()
            .filter_map(|env| env.get("id").and_then(|v| v.as_str()))
            .map(|id| id.to_string())
            .collect(),
        Err(_) => Vec::new(),
    }
}
