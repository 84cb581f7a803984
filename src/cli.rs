// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Subcommands:
// - check:  extract URLs from a document, verify them, write reports
// - fix:    apply a JSON report to a document (replace moved links)
// - review: build the HTML review page from a JSON report
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::CheckConfig;
use crate::extract::InputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "link-verifier",
    version,
    about = "Verify, classify and repair the links in a document",
    long_about = "link-verifier extracts every http(s) link from a document, checks them in \
                  polite concurrent batches with retries, and sorts them into OK, redirected \
                  and broken. Reports can be fed back to rewrite the document."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check every link in a document
    ///
    /// Example: link-verifier check top_vocational.html --report link_report.txt
    Check(CheckArgs),

    /// Rewrite a document using a JSON report from `check`
    ///
    /// Example: link-verifier fix page.html --report report.json --output page_fixed.html
    Fix {
        /// Document to rewrite
        document: PathBuf,

        /// JSON report written by `check --json-report`
        #[arg(long)]
        report: PathBuf,

        /// Where to write the rewritten document (default: <document>.fixed)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Also write the still-broken URLs here, one per line
        #[arg(long)]
        dead_links: Option<PathBuf>,
    },

    /// Build an HTML page for reviewing broken links by hand
    ///
    /// Example: link-verifier review report.json --output review_errors.html
    Review {
        /// JSON report written by `check --json-report`
        report: PathBuf,

        #[arg(long, default_value = "review_errors.html")]
        output: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Document to scan for links (HTML, Markdown or plain text)
    pub input: PathBuf,

    /// How to read the input
    #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
    pub format: InputFormat,

    /// Base URL for resolving relative links in HTML
    #[arg(long)]
    pub base_url: Option<String>,

    /// JSON config file (see CheckConfig for the fields)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// JSON object of `{ "old url": "replacement" }` corrections
    #[arg(long)]
    pub corrections: Option<PathBuf>,

    /// URLs verified concurrently per batch
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Pause between batches, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Deadline for one attempt, in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Retries for transient failures (timeouts, resets)
    #[arg(long)]
    pub retries: Option<u32>,

    /// Redirects followed before giving up
    #[arg(long)]
    pub max_redirects: Option<usize>,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Write the text report here
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Write the full JSON report here (input for `fix` and `review`)
    #[arg(long)]
    pub json_report: Option<PathBuf>,

    /// Write the HTML review page here
    #[arg(long)]
    pub review_page: Option<PathBuf>,

    /// Write a copy of the input with moved links replaced
    #[arg(long)]
    pub rewrite: Option<PathBuf>,

    /// Write the still-broken URLs here, one per line
    #[arg(long)]
    pub dead_links: Option<PathBuf>,
}

impl CheckArgs {
    /// Flags win over whatever the config file said.
    pub fn apply_overrides(&self, config: &mut CheckConfig) {
        if let Some(v) = self.batch_size {
            config.batch_size = v;
        }
        if let Some(v) = self.delay_ms {
            config.inter_batch_delay_ms = v;
        }
        if let Some(v) = self.timeout_ms {
            config.timeout_per_attempt_ms = v;
        }
        if let Some(v) = self.retries {
            config.max_retries = v;
        }
        if let Some(v) = self.max_redirects {
            config.max_redirect_hops = v;
        }
    }
}
