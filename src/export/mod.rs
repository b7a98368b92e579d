// src/export/mod.rs
use chrono::Utc;
use serde::Serialize;

use crate::extractors::changelog::ChangelogTable;

/// Top-level document written to the export file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    /// RFC 3339 timestamp taken when the document was assembled.
    pub extracted_at: String,
    /// Page the changelog was extracted from.
    pub source: String,
    pub total_tables: usize,
    pub total_entries: usize,
    pub data: Vec<ChangelogTable>,
}

/// Wraps extracted tables into an [`ExportDocument`], stamping the current
/// time and the entry/table totals. Callers pass a non-empty table list.
pub fn assemble(tables: Vec<ChangelogTable>, source: &str) -> ExportDocument {
    let total_entries = tables.iter().map(|table| table.entries.len()).sum();

    ExportDocument {
        extracted_at: Utc::now().to_rfc3339(),
        source: source.to_string(),
        total_tables: tables.len(),
        total_entries,
        data: tables,
    }
}

/// Export filename of the form `<prefix>-<YYYY-MM-DD>.json`.
pub fn export_filename(prefix: &str) -> String {
    format!("{}-{}.json", prefix, Utc::now().format("%Y-%m-%d"))
}
