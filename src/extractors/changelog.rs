// src/extractors/changelog.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector, node::Node};
use serde::Serialize;
use url::Url;

use crate::extractors::config::ExtractorConfig;
use crate::utils::error::ExtractError;

// --- CSS Selectors (Lazy Static) ---
// These are structural and hold for any table markup; the page-specific
// selectors live in ExtractorConfig and are compiled per extractor.
static BODY_ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("tbody tr").expect("Failed to compile BODY_ROW_SELECTOR")
});

static CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("td").expect("Failed to compile CELL_SELECTOR")
});

static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a").expect("Failed to compile LINK_SELECTOR")
});

// --- Regex Patterns (Lazy Static) ---
// The page prefixes cell text with an emoji glyph ("🕐 14:30"). The glyph is
// plain text, not an icon element, so class-based stripping cannot catch it:
// drop one leading run of non-alphanumeric characters followed by whitespace.
static LEADING_GLYPH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\p{L}\p{N}\s]+\s+").expect("Failed to compile LEADING_GLYPH_RE")
});

// --- Data Structures ---

/// One normalized changelog row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangelogEntry {
    pub time: String,
    /// Entry category, e.g. "Feil". Empty when the middle column carried a
    /// ticket link instead of a type label.
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    /// Ticket reference, only present when the middle column held a link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket: Option<String>,
    #[serde(rename = "ticketUrl", skip_serializing_if = "Option::is_none")]
    pub ticket_url: Option<String>,
}

/// One changelog table grouped under the date heading that preceded it.
/// `date` is None (JSON null) when no date heading came before the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangelogTable {
    pub date: Option<String>,
    pub entries: Vec<ChangelogEntry>,
}

// --- Main Extractor Structure ---

/// Walks the document for the changelog section described by an
/// [`ExtractorConfig`] and normalizes it into [`ChangelogTable`] records.
pub struct ChangelogExtractor {
    config: ExtractorConfig,
    anchor_selector: Selector,
    container_selector: Selector,
    column_selector: Selector,
    base_url: Option<Url>,
}

impl ChangelogExtractor {
    /// Compiles the configured selector map. Fails if any class or tag name
    /// in the configuration does not form a valid CSS selector.
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractError> {
        let anchor_selector = parse_selector(&config.anchor_heading_tag)?;
        let container_selector = parse_selector(&format!(".{}", config.row_container_class))?;
        let column_selector = parse_selector(&format!(
            ".{}, .{}, .{}",
            config.time_column_class, config.ticket_column_class, config.description_column_class
        ))?;

        let base_url = Url::parse(&config.source_url).ok();
        if base_url.is_none() {
            tracing::warn!(
                "Source URL '{}' is not parseable; ticket hrefs will be kept verbatim",
                config.source_url
            );
        }

        Ok(Self { config, anchor_selector, container_selector, column_selector, base_url })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extracts all changelog tables following the anchor heading.
    ///
    /// Returns `Ok(vec![])` when the anchor exists but no qualifying tables
    /// follow it, and `ExtractError::AnchorNotFound` when the anchor heading
    /// is missing from the document.
    pub fn extract(&self, html: &str) -> Result<Vec<ChangelogTable>, ExtractError> {
        let document = Html::parse_document(html);
        let anchor = self.find_anchor(&document)?;

        tracing::debug!(
            "Found anchor heading <{}> containing '{}'",
            anchor.value().name(),
            self.config.anchor_marker
        );

        // Fold over the anchor's following siblings, carrying the date
        // context set by the most recent date heading into each table.
        let (_, tables) = anchor
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .fold(
                (None::<String>, Vec::new()),
                |(current_date, mut tables), sibling| {
                    let tag = sibling.value().name();
                    if tag.eq_ignore_ascii_case(&self.config.date_heading_tag) {
                        let date = sibling.text().collect::<String>().trim().to_string();
                        tracing::trace!("Date heading: '{}'", date);
                        (Some(date), tables)
                    } else if tag.eq_ignore_ascii_case("table") {
                        let entries = self.extract_rows(sibling);
                        if entries.is_empty() {
                            tracing::debug!("Skipping table with no qualifying rows");
                        } else {
                            tables.push(ChangelogTable { date: current_date.clone(), entries });
                        }
                        (current_date, tables)
                    } else {
                        (current_date, tables)
                    }
                },
            );

        Ok(tables)
    }

    /// Collects the outer HTML of every element between the anchor heading
    /// and the end of its parent, for debug dumps.
    pub fn region_html(&self, html: &str) -> Result<Vec<String>, ExtractError> {
        let document = Html::parse_document(html);
        let anchor = self.find_anchor(&document)?;

        Ok(anchor
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .map(|sibling| sibling.html())
            .collect())
    }

    /// First heading of the configured tag whose text contains the marker.
    fn find_anchor<'a>(&self, document: &'a Html) -> Result<ElementRef<'a>, ExtractError> {
        document
            .select(&self.anchor_selector)
            .find(|heading| {
                heading
                    .text()
                    .collect::<String>()
                    .contains(&self.config.anchor_marker)
            })
            .ok_or_else(|| ExtractError::AnchorNotFound(self.config.anchor_marker.clone()))
    }

    fn extract_rows(&self, table: ElementRef) -> Vec<ChangelogEntry> {
        table
            .select(&BODY_ROW_SELECTOR)
            .filter_map(|row| self.extract_entry(row))
            .collect()
    }

    /// Normalizes one table row. Returns None for rows without the expected
    /// inner container; those are skipped without error.
    fn extract_entry(&self, row: ElementRef) -> Option<ChangelogEntry> {
        let cell = row.select(&CELL_SELECTOR).next()?;
        let container = cell.select(&self.container_selector).next()?;

        let mut time = String::new();
        let mut kind = String::new();
        let mut description = String::new();
        let mut ticket = None;
        let mut ticket_url = None;

        for column in container.select(&self.column_selector) {
            let has_class = |class: &str| column.value().classes().any(|c| c == class);

            if has_class(&self.config.time_column_class) {
                time = self.clean_text(column);
            } else if has_class(&self.config.ticket_column_class) {
                match column.select(&LINK_SELECTOR).next() {
                    Some(link) => {
                        ticket = Some(self.clean_text(link));
                        ticket_url = link
                            .value()
                            .attr("href")
                            .map(|href| self.resolve_href(href));
                    }
                    None => kind = self.clean_text(column),
                }
            } else if has_class(&self.config.description_column_class) {
                description = self.clean_text(column);
            }
        }

        Some(ChangelogEntry { time, kind, description, ticket, ticket_url })
    }

    /// Visible text of an element with icon elements stripped, the leading
    /// glyph token removed and surrounding whitespace trimmed.
    fn clean_text(&self, element: ElementRef) -> String {
        let mut raw = String::new();
        self.collect_visible_text(element, &mut raw);
        let trimmed = raw.trim();
        LEADING_GLYPH_RE.replace(trimmed, "").trim().to_string()
    }

    fn collect_visible_text(&self, element: ElementRef, out: &mut String) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => out.push_str(&text.text),
                Node::Element(child_element) => {
                    if self.config.is_icon_class_list(child_element.classes()) {
                        continue;
                    }
                    if let Some(child_ref) = ElementRef::wrap(child) {
                        self.collect_visible_text(child_ref, out);
                    }
                }
                _ => {}
            }
        }
    }

    /// Resolves a ticket href to an absolute URL against the source page,
    /// mirroring what a browser reports for a link's resolved location.
    /// Unresolvable hrefs are kept verbatim.
    fn resolve_href(&self, href: &str) -> String {
        match Url::parse(href) {
            Ok(absolute) => absolute.to_string(),
            Err(_) => self
                .base_url
                .as_ref()
                .and_then(|base| base.join(href).ok())
                .map(|resolved| resolved.to_string())
                .unwrap_or_else(|| href.to_string()),
        }
    }
}

fn parse_selector(input: &str) -> Result<Selector, ExtractError> {
    Selector::parse(input).map_err(|e| ExtractError::Selector(format!("'{}': {}", input, e)))
}
