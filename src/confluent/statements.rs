//! Flink SQL Statements
//!
//! Statements are listed, described and created. Nothing here stops,
//! updates or deletes one.

use super::client::{has_content, Api, ConfluentClient};
use super::{FetchFailed, Fetched};
use serde_json::{json, Value};

/// List the statements of an environment
pub async fn list_statements(client: &ConfluentClient, env: &str) -> Fetched<Vec<Value>> {
    let url = client.statements_url(env);
    client.get_collection(Api::FlinkSql, &url).await
}

/// Describe a single statement
pub async fn get_statement(client: &ConfluentClient, env: &str, statement: &str) -> Fetched<Value> {
    let url = client.statement_url(env, statement);
    client.get_document(Api::FlinkSql, &url).await
}

/// Request body for creating a statement.
///
/// `statement` is used both as the resource name and as the SQL text.
// TODO: split name and SQL text once callers pass them separately; the API
// expects a DNS-style name here, not a query.
pub fn submission_body(client: &ConfluentClient, env: &str, statement: &str, compute_pool_id: &str) -> Value {
    let config = client.config();

    json!({
        "name": statement,
        "organization_id": config.org_id,
        "environment_id": env,
        "spec": {
            "statement": statement,
            "compute_pool_id": compute_pool_id,
            "principal": config.principal_id,
            "stopped": false,
        }
    })
}

/// Submit a statement to a compute pool.
///
/// `Ok(None)` means the API accepted the call but sent back no `data` payload.
pub async fn submit_statement(
    client: &ConfluentClient,
    env: &str,
    statement: &str,
    compute_pool_id: &str,
) -> Fetched<Option<Value>> {
    let url = client.statement_url(env, statement);
    let body = submission_body(client, env, statement, compute_pool_id);

    tracing::info!("Submitting statement {} to pool {} in {}", statement, compute_pool_id, env);

    let response = match client.post(Api::FlinkSql, &url, &body).await {
        Ok(doc) if has_content(&doc) => doc,
        _ => return Err(FetchFailed { url }),
    };

    Ok(response.get("data").filter(|data| is_payload(data)).cloned())
}

fn is_payload(data: &Value) -> bool {
    match data {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
