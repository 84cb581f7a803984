// src/report/mod.rs
// =============================================================================
// Report emitters: everything that turns a finished Report into a file.
//
// - text: human-readable report with a copy-paste block of redirects
// - review: HTML review page for the remaining errors
// - JSON: the full Report via serde (also read back by `fix` / `review`)
// =============================================================================

mod review;
mod text;

pub use review::render_review_page;
pub use text::render_text;

use anyhow::{Context, Result};
use std::path::Path;

use crate::verify::Report;

pub fn render_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Loads a report previously written with [`render_json`].
pub fn load_json(path: &Path) -> Result<Report> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading report {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing report {}", path.display()))
}

pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).with_context(|| format!("writing {}", path.display()))
}
