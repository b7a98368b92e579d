// src/utils/html_debug.rs
use std::fs;
use std::path::Path;

use crate::utils::error::AppError;

/// Writes the raw HTML of the walked changelog region to a standalone file.
///
/// Each fragment is the outer HTML of one sibling element between the anchor
/// heading and the end of its parent. Date headings and tables are wrapped in
/// tinted markers so markup drift is visible at a glance when extraction comes
/// back empty.
pub fn save_region_debug<P: AsRef<Path>>(fragments: &[String], path: P) -> Result<(), AppError> {
    let path = path.as_ref();

    let mut debug_html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<style>\n");
    debug_html.push_str(".region-date { background-color: #FFFF99; }\n");
    debug_html.push_str(".region-table { background-color: #D0F0D0; }\n");
    debug_html.push_str(".region-other { background-color: #F0F0F0; }\n");
    debug_html.push_str("</style>\n</head>\n<body>\n");

    for fragment in fragments {
        let trimmed = fragment.trim_start();
        let css_class = if starts_with_tag(trimmed, "h4") {
            "region-date"
        } else if starts_with_tag(trimmed, "table") {
            "region-table"
        } else {
            "region-other"
        };

        debug_html.push_str(&format!("<div class=\"{}\">\n", css_class));
        debug_html.push_str(fragment);
        debug_html.push_str("\n</div>\n");
    }

    debug_html.push_str("</body>\n</html>\n");

    fs::write(path, debug_html)?;

    tracing::info!("Saved region debug HTML to {}", path.display());
    Ok(())
}

fn starts_with_tag(fragment: &str, tag: &str) -> bool {
    let lower = fragment.to_lowercase();
    let prefix = format!("<{}", tag);
    // Tag name must end at '>' or whitespace, not match e.g. <h40> or <tablex>
    lower.strip_prefix(&prefix).is_some_and(|rest| {
        rest.starts_with('>') || rest.starts_with(char::is_whitespace)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_prefix_matching() {
        assert!(starts_with_tag("<h4>12. mars 2024</h4>", "h4"));
        assert!(starts_with_tag("<TABLE class=\"x\">", "table"));
        assert!(!starts_with_tag("<h40>", "h4"));
        assert!(!starts_with_tag("<p>text</p>", "h4"));
    }
}
