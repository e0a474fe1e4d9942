//! Tool Operations
//!
//! The operations exposed to the tool host. Each takes named string
//! arguments and always answers with text: lookups that fail or find
//! nothing become a descriptive message, never an error.

use crate::confluent::client::ConfluentClient;
use crate::confluent::{compute_pools, environments, statements, FetchFailed};
use crate::format::{format_compute_pool, format_statement, SEPARATOR};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

pub const NO_ENVIRONMENTS: &str = "Unable to fetch environments or no environments found.";
pub const NO_STATEMENTS_ANYWHERE: &str = "No statements found in any environment";
pub const NO_STATEMENTS: &str = "No statements found";
pub const NO_STATEMENT: &str = "No statement found";
pub const NO_COMPUTE_POOLS: &str = "No Compute Pools found";

/// Exposed tools, by wire name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    GetEnvironments,
    GetAllStatements,
    GetStatements,
    GetStatement,
    GetPools,
    GetPool,
    SubmitStatement,
}

impl Tool {
    pub const ALL: [Tool; 7] = [
        Tool::GetEnvironments,
        Tool::GetAllStatements,
        Tool::GetStatements,
        Tool::GetStatement,
        Tool::GetPools,
        Tool::GetPool,
        Tool::SubmitStatement,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Tool::GetEnvironments => "get_environments",
            Tool::GetAllStatements => "get_all_statements",
            Tool::GetStatements => "get_statements",
            Tool::GetStatement => "get_statement",
            Tool::GetPools => "get_pools",
            Tool::GetPool => "get_pool",
            Tool::SubmitStatement => "submit_statement",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    pub fn description(self) -> &'static str {
        match self {
            Tool::GetEnvironments => "Get all environments from Confluent Cloud.",
            Tool::GetAllStatements => "Get all Flink statements from all environments.",
            Tool::GetStatements => "Get all statements for an environment in Confluent Cloud.",
            Tool::GetStatement => "Get details about a Flink statement.",
            Tool::GetPools => "Get all Flink compute pools for an environment in Confluent Cloud.",
            Tool::GetPool => "Get information about a Flink compute pool in Confluent Cloud.",
            Tool::SubmitStatement => "Submit a Flink statement.",
        }
    }

    /// Named string parameters, all required
    fn parameters(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Tool::GetEnvironments | Tool::GetAllStatements => &[],
            Tool::GetStatements => &[("env", "The environment to get statements for.")],
            Tool::GetStatement => &[
                ("env", "The environment to get statements for."),
                ("statement", "The statement to get details for."),
            ],
            Tool::GetPools => &[("env", "The environment to get pools for.")],
            Tool::GetPool => &[
                ("env", "The environment to get pools for."),
                ("pool", "The pool to get information for."),
            ],
            Tool::SubmitStatement => &[
                ("env", "The environment to submit statement to."),
                ("statement", "The Flink SQL statement to submit."),
                ("compute_pool_id", "The compute pool to run the statement on."),
            ],
        }
    }

    /// JSON schema of the tool's arguments
    pub fn input_schema(self) -> Value {
        let params = self.parameters();
        let properties: serde_json::Map<String, Value> = params
            .iter()
            .map(|(name, description)| {
                (
                    name.to_string(),
                    json!({"type": "string", "description": description}),
                )
            })
            .collect();
        let required: Vec<&str> = params.iter().map(|(name, _)| *name).collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

#[derive(Debug, Deserialize)]
struct EnvArgs {
    env: String,
}

#[derive(Debug, Deserialize)]
struct StatementArgs {
    env: String,
    statement: String,
}

#[derive(Debug, Deserialize)]
struct PoolArgs {
    env: String,
    pool: String,
}

#[derive(Debug, Deserialize)]
struct SubmitArgs {
    env: String,
    statement: String,
    compute_pool_id: String,
}

/// A validated tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCall {
    GetEnvironments,
    GetAllStatements,
    GetStatements { env: String },
    GetStatement { env: String, statement: String },
    GetPools { env: String },
    GetPool { env: String, pool: String },
    SubmitStatement { env: String, statement: String, compute_pool_id: String },
}

fn parse_args<T: DeserializeOwned>(tool: Tool, arguments: &Value) -> Result<T> {
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments.clone()
    };
    serde_json::from_value(arguments)
        .with_context(|| format!("Invalid arguments for {}", tool.name()))
}

impl ToolCall {
    /// Resolve a tool name and its named arguments
    pub fn parse(name: &str, arguments: &Value) -> Result<Self> {
        let tool = Tool::from_name(name).with_context(|| format!("Unknown tool: {}", name))?;

        let call = match tool {
            Tool::GetEnvironments => ToolCall::GetEnvironments,
            Tool::GetAllStatements => ToolCall::GetAllStatements,
            Tool::GetStatements => {
                let EnvArgs { env } = parse_args(tool, arguments)?;
                ToolCall::GetStatements { env }
            }
            Tool::GetStatement => {
                let StatementArgs { env, statement } = parse_args(tool, arguments)?;
                ToolCall::GetStatement { env, statement }
            }
            Tool::GetPools => {
                let EnvArgs { env } = parse_args(tool, arguments)?;
                ToolCall::GetPools { env }
            }
            Tool::GetPool => {
                let PoolArgs { env, pool } = parse_args(tool, arguments)?;
                ToolCall::GetPool { env, pool }
            }
            Tool::SubmitStatement => {
                let SubmitArgs { env, statement, compute_pool_id } = parse_args(tool, arguments)?;
                ToolCall::SubmitStatement { env, statement, compute_pool_id }
            }
        };

        Ok(call)
    }

    /// Run the call against the remote API
    pub async fn run(&self, client: &ConfluentClient) -> ToolOutput {
        match self {
            ToolCall::GetEnvironments => ToolOutput::Items(get_environments(client).await),
            ToolCall::GetAllStatements => ToolOutput::Text(get_all_statements(client).await),
            ToolCall::GetStatements { env } => ToolOutput::Text(get_statements(client, env).await),
            ToolCall::GetStatement { env, statement } => {
                ToolOutput::Text(get_statement(client, env, statement).await)
            }
            ToolCall::GetPools { env } => ToolOutput::Text(get_pools(client, env).await),
            ToolCall::GetPool { env, pool } => ToolOutput::Text(get_pool(client, env, pool).await),
            ToolCall::SubmitStatement { env, statement, compute_pool_id } => {
                ToolOutput::Text(submit_statement(client, env, statement, compute_pool_id).await)
            }
        }
    }
}

/// What a tool hands back to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutput {
    Text(String),
    /// One text item per entry (environment listing)
    Items(Vec<String>),
}

impl ToolOutput {
    pub fn into_texts(self) -> Vec<String> {
        match self {
            ToolOutput::Text(text) => vec![text],
            ToolOutput::Items(items) => items,
        }
    }
}

fn join_reports(items: &[Value], format: fn(&Value) -> String) -> String {
    items.iter().map(format).collect::<Vec<_>>().join(SEPARATOR)
}

/// List environment IDs; empty when the listing fails
pub async fn get_environments(client: &ConfluentClient) -> Vec<String> {
    environments::list_environment_ids(client).await
}

/// Statements of every environment, each prefixed with its environment ID
pub async fn get_all_statements(client: &ConfluentClient) -> String {
    let envs = environments::list_environment_ids(client).await;
    if envs.is_empty() {
        return NO_ENVIRONMENTS.to_string();
    }

    // join_all keeps results in environment order
    let lookups = futures::future::join_all(
        envs.iter().map(|env| statements::list_statements(client, env)),
    )
    .await;

    let reports: Vec<String> = envs
        .iter()
        .zip(lookups)
        .flat_map(|(env, lookup)| {
            if let Err(FetchFailed { url }) = &lookup {
                tracing::debug!("Skipping environment {}: {} failed", env, url);
            }
            lookup
                .unwrap_or_default()
                .into_iter()
                .map(move |statement| format!("Environment: {}\n{}", env, format_statement(&statement)))
        })
        .collect();

    if reports.is_empty() {
        NO_STATEMENTS_ANYWHERE.to_string()
    } else {
        reports.join(SEPARATOR)
    }
}

/// Statements of one environment
pub async fn get_statements(client: &ConfluentClient, env: &str) -> String {
    match statements::list_statements(client, env).await {
        Ok(items) if items.is_empty() => NO_STATEMENTS.to_string(),
        Ok(items) => join_reports(&items, format_statement),
        Err(FetchFailed { url }) => {
            format!("Unable to fetch statements or no statements found. URL: {}", url)
        }
    }
}

/// One statement
pub async fn get_statement(client: &ConfluentClient, env: &str, statement: &str) -> String {
    match statements::get_statement(client, env, statement).await {
        Ok(doc) => format_statement(&doc),
        Err(FetchFailed { url }) => {
            format!("Unable to fetch statement or statement not found. URL: {}", url)
        }
    }
}

/// Compute pools of one environment
pub async fn get_pools(client: &ConfluentClient, env: &str) -> String {
    match compute_pools::list_compute_pools(client, env).await {
        Ok(items) if items.is_empty() => NO_COMPUTE_POOLS.to_string(),
        Ok(items) => join_reports(&items, format_compute_pool),
        Err(FetchFailed { url }) => {
            format!("Unable to fetch compute pools or no compute pools found. URL: {}", url)
        }
    }
}

/// One compute pool
pub async fn get_pool(client: &ConfluentClient, env: &str, pool: &str) -> String {
    match compute_pools::get_compute_pool(client, env, pool).await {
        Ok(doc) => format_compute_pool(&doc),
        Err(FetchFailed { url }) => {
            format!("Unable to fetch compute pool or compute pool not found. URL: {}", url)
        }
    }
}

/// Create a statement and report it back
pub async fn submit_statement(
    client: &ConfluentClient,
    env: &str,
    statement: &str,
    compute_pool_id: &str,
) -> String {
    match statements::submit_statement(client, env, statement, compute_pool_id).await {
        Ok(Some(doc)) => format_statement(&doc),
        Ok(None) => NO_STATEMENT.to_string(),
        Err(FetchFailed { url }) => {
            format!("Unable to fetch statement or statement not found. URL: {}", url)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names_round_trip() {
        for tool in Tool::ALL {
            assert_eq!(Tool::from_name(tool.name()), Some(tool));
        }
        assert_eq!(Tool::from_name("drop_everything"), None);
    }

    #[test]
    fn test_input_schema_lists_required_parameters() {
        let schema = Tool::SubmitStatement.input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(
            schema["required"],
            json!(["env", "statement", "compute_pool_id"])
        );
        assert_eq!(schema["properties"]["env"]["type"], "string");

        let schema = Tool::GetEnvironments.input_schema();
        assert_eq!(schema["required"], json!([]));
    }

    #[test]
    fn test_parse_call_with_named_arguments() {
        let call = ToolCall::parse("get_pool", &json!({"env": "env-1", "pool": "lfcp-1"})).unwrap();
        assert_eq!(
            call,
            ToolCall::GetPool {
                env: "env-1".to_string(),
                pool: "lfcp-1".to_string()
            }
        );
    }

    #[test]
    fn test_parse_call_without_arguments() {
        assert_eq!(
            ToolCall::parse("get_environments", &Value::Null).unwrap(),
            ToolCall::GetEnvironments
        );
        assert_eq!(
            ToolCall::parse("get_all_statements", &json!({})).unwrap(),
            ToolCall::GetAllStatements
        );
    }

    #[test]
    fn test_parse_call_missing_argument() {
        let err = ToolCall::parse("get_statement", &json!({"env": "env-1"})).unwrap_err();
        assert!(err.to_string().contains("get_statement"));
    }

    #[test]
    fn test_parse_call_wrong_type() {
        assert!(ToolCall::parse("get_statements", &json!({"env": 5})).is_err());
    }

    #[test]
    fn test_parse_unknown_tool() {
        let err = ToolCall::parse("delete_statement", &json!({})).unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool: delete_statement");
    }

    #[test]
    fn test_output_into_texts() {
        assert_eq!(ToolOutput::Text("a".into()).into_texts(), vec!["a"]);
        assert_eq!(
            ToolOutput::Items(vec!["env-1".into(), "env-2".into()]).into_texts(),
            vec!["env-1", "env-2"]
        );
    }
}
