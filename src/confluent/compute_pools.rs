//! Flink Compute Pools
//!
//! Read-only: pools are listed and described, never created here.

use super::client::{Api, ConfluentClient};
use super::Fetched;
use serde_json::Value;

/// List the compute pools of an environment
pub async fn list_compute_pools(client: &ConfluentClient, env: &str) -> Fetched<Vec<Value>> {
    let url = client.compute_pools_url(env);
    client.get_collection(Api::ControlPlane, &url).await
}

/// Describe a single compute pool
pub async fn get_compute_pool(client: &ConfluentClient, env: &str, pool: &str) -> Fetched<Value> {
    let url = client.compute_pool_url(env, pool);
    client.get_document(Api::ControlPlane, &url).await
}
