//! Compute pool report

use super::{field, UNKNOWN};
use serde_json::Value;

const FIELDS: &[(&str, &str)] = &[
    ("Kind", "kind"),
    ("Compute Pool Name", "spec.display_name"),
    ("ID", "id"),
    ("Created At", "metadata.created_at"),
    ("Updated At", "metadata.updated_at"),
    ("Resource Name", "metadata.resource_name"),
    ("Status", "status.phase"),
    ("Current CFU", "status.current_cfu"),
    ("Max CFU", "spec.max_cfu"),
    ("Cloud", "spec.cloud"),
    ("Region", "spec.region"),
    ("Environment ID", "spec.environment.id"),
    ("AI Enabled", "spec.enable_ai"),
];

/// Format a compute pool into a readable report
pub fn format_compute_pool(pool: &Value) -> String {
    FIELDS
        .iter()
        .map(|(label, path)| format!("{}: {}", label, field(pool, path, UNKNOWN)))
        .collect::<Vec<_>>()
        .join("\n")
}
