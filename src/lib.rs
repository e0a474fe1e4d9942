//! Confluent Cloud Flink tools
//!
//! Exposes environments, compute pools and Flink SQL statements as a small
//! set of text-returning tool operations, served over MCP stdio.
//!
//! - [`config`] - Settings and credentials, fixed at startup
//! - [`confluent`] - HTTP gateway, client and typed resource lookups
//! - [`format`] - Text reports for statements and compute pools
//! - [`tools`] - The exposed operations
//! - [`mcp`] - JSON-RPC stdio server

pub mod config;
pub mod confluent;
pub mod format;
pub mod mcp;
pub mod tools;

pub use confluent::client::ConfluentClient;
