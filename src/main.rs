use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use flink_mcp::config::{Config, Overrides};
use flink_mcp::mcp::McpServer;
use flink_mcp::tools::{Tool, ToolCall};
use flink_mcp::ConfluentClient;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// MCP tool server for Confluent Cloud Flink
#[derive(Parser, Debug)]
#[command(name = "flink-mcp", version, about, long_about = None)]
struct Args {
    /// Config file (defaults to <config dir>/flink-mcp/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Confluent Cloud organization ID
    #[arg(long, env = "CONFLUENT_ORG_ID", global = true)]
    org_id: Option<String>,

    /// Cloud provider hosting the Flink region
    #[arg(long, env = "CONFLUENT_CLOUD_PROVIDER", global = true)]
    cloud_provider: Option<String>,

    /// Flink region
    #[arg(long, env = "CONFLUENT_CLOUD_REGION", global = true)]
    cloud_region: Option<String>,

    /// Principal that submitted statements run as
    #[arg(long, env = "CONFLUENT_PRINCIPAL_ID", global = true)]
    principal_id: Option<String>,

    /// Cloud API key (environments, compute pools)
    #[arg(long, env = "CONFLUENT_CLOUD_API_KEY", hide_env_values = true, global = true)]
    cloud_api_key: Option<String>,

    /// Cloud API secret
    #[arg(long, env = "CONFLUENT_CLOUD_API_SECRET", hide_env_values = true, global = true)]
    cloud_api_secret: Option<String>,

    /// Flink API key (statements)
    #[arg(long, env = "FLINK_API_KEY", hide_env_values = true, global = true)]
    flink_api_key: Option<String>,

    /// Flink API secret
    #[arg(long, env = "FLINK_API_SECRET", hide_env_values = true, global = true)]
    flink_api_secret: Option<String>,

    /// Override the control plane base URL
    #[arg(long, env = "CONFLUENT_CONTROL_PLANE_URL", global = true)]
    control_plane_endpoint: Option<String>,

    /// Override the Flink SQL base URL
    #[arg(long, env = "FLINK_ENDPOINT", global = true)]
    flink_endpoint: Option<String>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve tools over MCP stdio (default)
    Serve,
    /// Run one tool and print its output
    Call {
        /// Tool name, e.g. get_statements
        tool: String,
        /// Named argument as key=value, repeatable
        #[arg(short, long = "arg", value_parser = parse_key_value)]
        args: Vec<(String, String)>,
    },
    /// List available tools
    Tools,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            org_id: self.org_id.clone(),
            cloud_provider: self.cloud_provider.clone(),
            cloud_region: self.cloud_region.clone(),
            principal_id: self.principal_id.clone(),
            cloud_api_key: self.cloud_api_key.clone(),
            cloud_api_secret: self.cloud_api_secret.clone(),
            flink_api_key: self.flink_api_key.clone(),
            flink_api_secret: self.flink_api_secret.clone(),
            control_plane_endpoint: self.control_plane_endpoint.clone(),
            flink_endpoint: self.flink_endpoint.clone(),
        }
    }
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", s))
}

// stdout carries the protocol, so logs only ever go to a file
fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("flink-mcp started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("flink-mcp").join("flink-mcp.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".flink-mcp").join("flink-mcp.log");
    }
    PathBuf::from("flink-mcp.log")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let config = Config::load(args.config.as_deref())?.with_overrides(args.overrides());
    config.warn_if_incomplete();

    tracing::info!(
        "Using organization: {}, region: {}.{}",
        config.org_id,
        config.cloud_provider,
        config.cloud_region
    );

    let client = ConfluentClient::new(config);

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let server = McpServer::new(client);
            server
                .serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
                .await?;
        }
        Command::Call { tool, args } => {
            let arguments: Map<String, Value> = args
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect();
            let call = ToolCall::parse(&tool, &Value::Object(arguments))?;

            for text in call.run(&client).await.into_texts() {
                println!("{}", text);
            }
        }
        Command::Tools => {
            for tool in Tool::ALL {
                println!("{:<20} {}", tool.name(), tool.description());
            }
        }
    }

    Ok(())
}
