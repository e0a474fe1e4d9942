//! Statement report

use super::{display_value, field, lookup, non_empty_object, UNKNOWN};
use serde_json::Value;
use std::fmt;
use std::fmt::Write;

/// Column of a statement's result schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub data_type: ColumnType,
}

/// Type descriptor of a schema column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnType {
    pub base: String,
    pub length: Option<String>,
    pub nullable: bool,
}

impl From<&Value> for ColumnType {
    fn from(value: &Value) -> Self {
        Self {
            base: field(value, "type", UNKNOWN),
            length: lookup(value, "length").map(display_value),
            nullable: value
                .get("nullable")
                .and_then(|v| v.as_bool())
                .unwrap_or(true),
        }
    }
}

impl From<&Value> for Column {
    fn from(value: &Value) -> Self {
        Self {
            name: field(value, "name", UNKNOWN),
            data_type: value
                .get("type")
                .map(ColumnType::from)
                .unwrap_or_else(|| ColumnType::from(&Value::Null)),
        }
    }
}

/// `VARCHAR(20) NOT NULL`, `INT NULL`
impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)?;
        if let Some(length) = &self.length {
            write!(f, "({})", length)?;
        }
        f.write_str(if self.nullable { " NULL" } else { " NOT NULL" })
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.data_type)
    }
}

/// Columns of `status.traits.schema`, if the statement reports any
fn schema_columns(statement: &Value) -> Option<Vec<Column>> {
    let schema = non_empty_object(statement, "status.traits.schema")?;
    let columns = schema.get("columns")?;

    Some(
        columns
            .as_array()
            .map(|cols| cols.iter().map(Column::from).collect())
            .unwrap_or_default(),
    )
}

/// Format a statement into a readable report
pub fn format_statement(statement: &Value) -> String {
    let lines = [
        ("Statement Name", field(statement, "name", UNKNOWN)),
        ("Environment ID", field(statement, "environment_id", UNKNOWN)),
        ("Organization ID", field(statement, "organization_id", UNKNOWN)),
        ("Created At", field(statement, "metadata.created_at", UNKNOWN)),
        ("Updated At", field(statement, "metadata.updated_at", UNKNOWN)),
        ("Status", field(statement, "status.phase", UNKNOWN)),
        ("Network Kind", field(statement, "status.network_kind", UNKNOWN)),
        ("SQL Kind", field(statement, "status.traits.sql_kind", UNKNOWN)),
        ("Is Append Only", field(statement, "status.traits.is_append_only", UNKNOWN)),
        ("Is Bounded", field(statement, "status.traits.is_bounded", UNKNOWN)),
        ("SQL Statement", field(statement, "spec.statement", "No statement available")),
        ("Status Detail", field(statement, "status.detail", "No details available")),
        ("Compute Pool ID", field(statement, "spec.compute_pool_id", UNKNOWN)),
        ("Principal", field(statement, "spec.principal", UNKNOWN)),
    ];

    let mut output = lines
        .iter()
        .map(|(label, value)| format!("{}: {}", label, value))
        .collect::<Vec<_>>()
        .join("\n");

    // Writing to a String cannot fail
    if let Some(properties) = non_empty_object(statement, "spec.properties") {
        output.push_str("\nProperties:");
        for (key, value) in properties {
            let _ = write!(output, "\n  - {}: {}", key, display_value(value));
        }
    }

    if non_empty_object(statement, "status.scaling_status").is_some() {
        let _ = write!(
            output,
            "\nScaling Status: {}\nLast Updated: {}",
            field(statement, "status.scaling_status.scaling_state", UNKNOWN),
            field(statement, "status.scaling_status.last_updated", UNKNOWN),
        );
    }

    if let Some(offsets) = lookup(statement, "status.latest_offsets").filter(|v| is_non_empty(v)) {
        let _ = write!(
            output,
            "\nLatest Offsets: {}\nOffsets Timestamp: {}",
            display_value(offsets),
            field(statement, "status.latest_offsets_timestamp", UNKNOWN),
        );
    }

    if let Some(columns) = schema_columns(statement) {
        output.push_str("\nSchema:");
        for column in columns {
            let _ = write!(output, "\n  - {}", column);
        }
    }

    output
}

fn is_non_empty(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::String(s) => !s.is_empty(),
        Value::Null => false,
        _ => true,
    }
}
