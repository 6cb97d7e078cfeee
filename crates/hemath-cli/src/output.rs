//! Report rendering in text and JSON form.

use std::collections::BTreeMap;
use std::io;

use hemath_memory::PoolStats;
use serde::Serialize;

use crate::config::OutputFormat;

/// The outcome of one operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Subcommand name.
    pub operation: &'static str,
    /// Named results, rendered in key order.
    pub fields: BTreeMap<&'static str, serde_json::Value>,
    /// Pool counters, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<PoolStats>,
}

impl Report {
    /// An empty report for `operation`.
    #[must_use]
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            fields: BTreeMap::new(),
            pool: None,
        }
    }

    /// Add a field.
    #[must_use]
    pub fn with(mut self, key: &'static str, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(key, value.into());
        self
    }

    /// Render the report.
    pub fn render(&self, format: OutputFormat) -> io::Result<String> {
        match format {
            OutputFormat::Json => serde_json::to_string_pretty(self)
                .map(|json| json + "\n")
                .map_err(io::Error::other),
            OutputFormat::Text => Ok(self.render_text()),
        }
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        for (key, value) in &self.fields {
            out.push_str(key);
            out.push_str(": ");
            match value {
                serde_json::Value::String(s) => out.push_str(s),
                other => out.push_str(&other.to_string()),
            }
            out.push('\n');
        }
        if let Some(stats) = self.pool {
            out.push_str(&format!(
                "pool: hits={} misses={} slab_growths={} releases={}\n",
                stats.hits, stats.misses, stats.slab_growths, stats.releases
            ));
        }
        out
    }
}

/// Write rendered output to a file.
pub fn write_to_file(path: &str, rendered: &str) -> io::Result<()> {
    std::fs::write(path, rendered)
}
