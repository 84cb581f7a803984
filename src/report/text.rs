// src/report/text.rs
// =============================================================================
// Plain-text report.
//
// Layout:
// - redirected links as `"original": "final",` lines, so the block can be
//   pasted straight into a JSON correction mapping
// - error links as `// ERROR: url (Reason: ...)` lines
// - OK links, one per line
// =============================================================================

use std::fmt::{self, Write};

use crate::verify::Report;

const RULE: &str = "==============================================";

pub fn render_text(report: &Report, source: &str) -> String {
    let mut out = String::new();
    // Writing into a String never fails
    let _ = write_report(&mut out, report, source);
    out
}

fn write_report(out: &mut String, report: &Report, source: &str) -> fmt::Result {
    let summary = report.summary();

    writeln!(out, "LINK ANALYSIS REPORT for {source}")?;
    writeln!(out, "{RULE}\n")?;

    writeln!(
        out,
        "--- REDIRECTED LINKS TO COPY ({}) ---",
        summary.counts.redirected
    )?;
    writeln!(out, "// Copy the lines below into your correctionMapping")?;
    for entry in &summary.redirected {
        writeln!(
            out,
            "  {}: {},",
            json_string(&entry.original),
            json_string(&entry.final_url)
        )?;
    }

    writeln!(
        out,
        "\n\n--- ERROR LINKS TO INVESTIGATE ({}) ---",
        summary.counts.error
    )?;
    for entry in &summary.error {
        writeln!(out, "// ERROR: {} (Reason: {})", entry.url, entry.reason)?;
    }

    writeln!(out, "\n\n--- OK LINKS ({}) ---", summary.counts.ok)?;
    for url in &summary.ok {
        writeln!(out, "{url}")?;
    }

    Ok(())
}

fn json_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}
