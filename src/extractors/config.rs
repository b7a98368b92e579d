// src/extractors/config.rs

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::utils::error::AppError;

/// Selector map describing the changelog markup of one page layout.
///
/// All coupling to the target page's markup lives here: the anchor heading,
/// the date sub-headings, the per-row column classes and the icon classes to
/// strip. When the page layout changes, only this configuration needs to be
/// edited, not the extraction logic. `Default` reproduces the cachetur.no/app
/// layout; a full map can be loaded from a JSON file with `--config`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractorConfig {
    /// Tag of the heading that opens the changelog section.
    pub anchor_heading_tag: String,
    /// Marker string the anchor heading's text must contain.
    pub anchor_marker: String,
    /// Tag of the sub-headings that carry a section date.
    pub date_heading_tag: String,
    /// Class of the inner container inside each row's first cell.
    pub row_container_class: String,
    /// Class of the time column.
    pub time_column_class: String,
    /// Class of the type-or-ticket-link column.
    pub ticket_column_class: String,
    /// Class of the description column.
    pub description_column_class: String,
    /// Exact icon class names whose elements are dropped before reading text.
    pub icon_classes: Vec<String>,
    /// Class-name substrings that also mark an element as an icon.
    pub icon_class_markers: Vec<String>,
    /// Page the changelog comes from. Recorded in the export document and
    /// used as the base for resolving relative ticket hrefs.
    pub source_url: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            anchor_heading_tag: "h2".to_string(),
            anchor_marker: "Endringslogg".to_string(),
            date_heading_tag: "h4".to_string(),
            row_container_class: "row".to_string(),
            time_column_class: "col-md-1".to_string(),
            ticket_column_class: "col-md-2".to_string(),
            description_column_class: "col-md-7".to_string(),
            icon_classes: ["fa", "fas", "far", "fab", "glyphicon"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            icon_class_markers: ["fa-", "glyphicon-", "material-icons"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            source_url: "https://cachetur.no/app".to_string(),
        }
    }
}

impl ExtractorConfig {
    /// Loads a selector map from a JSON file. Missing fields fall back to the
    /// cachetur.no/app defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Invalid selector map '{}': {}", path.display(), e))
        })?;
        tracing::debug!("Loaded selector map from {}", path.display());
        Ok(config)
    }

    /// True if an element with these classes is an icon glyph to be stripped.
    pub fn is_icon_class_list<'a, I: Iterator<Item = &'a str>>(&self, mut classes: I) -> bool {
        classes.any(|class| {
            self.icon_classes.iter().any(|exact| exact == class)
                || self.icon_class_markers.iter().any(|marker| class.contains(marker))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_cachetur_layout() {
        let config = ExtractorConfig::default();
        assert_eq!(config.anchor_heading_tag, "h2");
        assert_eq!(config.anchor_marker, "Endringslogg");
        assert_eq!(config.time_column_class, "col-md-1");
        assert_eq!(config.ticket_column_class, "col-md-2");
        assert_eq!(config.description_column_class, "col-md-7");
    }

    #[test]
    fn icon_class_detection() {
        let config = ExtractorConfig::default();
        assert!(config.is_icon_class_list(["fa", "fa-clock"].into_iter()));
        assert!(config.is_icon_class_list(["glyphicon-wrench"].into_iter()));
        assert!(!config.is_icon_class_list(["col-md-1"].into_iter()));
        // "fast-nav" must not trip the exact "fa" class or the "fa-" marker
        assert!(!config.is_icon_class_list(["fast-nav"].into_iter()));
    }

    #[test]
    fn partial_config_file_falls_back_to_defaults() {
        let json = r#"{ "anchorMarker": "Changelog", "dateHeadingTag": "h3" }"#;
        let config: ExtractorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.anchor_marker, "Changelog");
        assert_eq!(config.date_heading_tag, "h3");
        assert_eq!(config.anchor_heading_tag, "h2");
        assert_eq!(config.row_container_class, "row");
    }
}
