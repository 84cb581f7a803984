// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, to stderr so stdout stays machine-readable)
// 2. Parse command-line arguments using clap
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = all links fine, 1 = broken links, 2 = error)
// =============================================================================

mod cli;
mod config;
mod error;
mod extract;
mod report;
mod rewrite;
mod verify;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::{CheckArgs, Cli, Commands};
use config::CheckConfig;
use verify::{CheckResult, HttpProber, Report, ResultKind};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("link_verifier=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = no broken links
//   Ok(1) = broken links found
//   Err   = anything that stopped the run (exit code 2)
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => handle_check(args).await,
        Commands::Fix {
            document,
            report,
            output,
            dead_links,
        } => handle_fix(&document, &report, output, dead_links.as_deref()),
        Commands::Review { report, output } => handle_review(&report, &output),
    }
}

// Handles the 'check' subcommand
async fn handle_check(args: CheckArgs) -> Result<i32> {
    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading input {}", args.input.display()))?;

    let format = args.format.resolve(&args.input);
    let urls = extract::extract_urls(&content, format, args.base_url.as_deref());
    info!(
        input = %args.input.display(),
        format = ?format,
        unique_urls = urls.len(),
        "Extracted links"
    );

    let mut config = match &args.config {
        Some(path) => CheckConfig::from_file(path)?,
        None => CheckConfig::default(),
    };
    if let Some(path) = &args.corrections {
        config.merge_corrections_file(path)?;
    }
    args.apply_overrides(&mut config);

    let prober = HttpProber::new(&config.probe_settings())?;
    let report = verify::check_urls(&urls, &config, &prober).await?;

    print_results(&report, args.json)?;

    let source = args.input.display().to_string();
    if let Some(path) = &args.report {
        report::write_file(path, &report::render_text(&report, &source))?;
        info!(path = %path.display(), "Text report saved");
    }
    if let Some(path) = &args.json_report {
        report::write_file(path, &report::render_json(&report)?)?;
        info!(path = %path.display(), "JSON report saved");
    }
    if let Some(path) = &args.review_page {
        report::write_file(path, &report::render_review_page(&report)?)?;
        info!(path = %path.display(), "Review page saved");
    }
    if let Some(path) = &args.rewrite {
        apply_rewrite(&content, &report, path)?;
    }
    if let Some(path) = &args.dead_links {
        write_dead_links(&report, path)?;
    }

    Ok(if report.has_errors() { 1 } else { 0 })
}

// Handles the 'fix' subcommand
fn handle_fix(
    document: &Path,
    report_path: &Path,
    output: Option<PathBuf>,
    dead_links: Option<&Path>,
) -> Result<i32> {
    let report = report::load_json(report_path)?;
    let content = std::fs::read_to_string(document)
        .with_context(|| format!("reading document {}", document.display()))?;

    let output = output.unwrap_or_else(|| fixed_path(document));
    apply_rewrite(&content, &report, &output)?;

    if let Some(path) = dead_links {
        write_dead_links(&report, path)?;
    }
    Ok(0)
}

// Handles the 'review' subcommand
fn handle_review(report_path: &Path, output: &Path) -> Result<i32> {
    let report = report::load_json(report_path)?;

    if !report.has_errors() {
        println!("No errors in the report. Nothing to review!");
        return Ok(0);
    }

    report::write_file(output, &report::render_review_page(&report)?)?;
    println!(
        "Review page for {} broken link(s) saved to {}",
        report.counts.error,
        output.display()
    );
    Ok(0)
}

fn apply_rewrite(content: &str, report: &Report, output: &Path) -> Result<()> {
    let outcome = rewrite::rewrite_document(content, &report.substitutions())?;

    for replacement in &outcome.replacements {
        if replacement.occurrences == 0 {
            warn!(
                from = %replacement.from,
                to = %replacement.to,
                "Substitution matched nothing in the document"
            );
        }
    }

    report::write_file(output, &outcome.document)?;
    info!(
        path = %output.display(),
        substitutions = outcome.replacements.len(),
        replaced = outcome.total_replaced(),
        "Rewritten document saved"
    );
    Ok(())
}

fn write_dead_links(report: &Report, path: &Path) -> Result<()> {
    report::write_file(path, &rewrite::dead_links_list(&report.error_urls()))?;
    info!(path = %path.display(), count = report.counts.error, "Dead links saved");
    Ok(())
}

// page.html -> page_fixed.html
fn fixed_path(document: &Path) -> PathBuf {
    let stem = document
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    let name = match document.extension() {
        Some(ext) => format!("{stem}_fixed.{}", ext.to_string_lossy()),
        None => format!("{stem}_fixed"),
    };
    document.with_file_name(name)
}

// Prints the results either as a table or JSON
fn print_results(report: &Report, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&report.summary())?);
    } else {
        print_table(report);
    }
    Ok(())
}

// Prints results as a human-readable table in the terminal
fn print_table(report: &Report) {
    println!("{:<60} {:<15} {:<40}", "URL", "STATUS", "DETAIL");
    println!("{}", "=".repeat(115));

    for result in report.results() {
        println!(
            "{:<60} {:<15} {:<40}",
            truncate(&result.original_url, 57),
            format_status(result.kind),
            detail(result)
        );
    }

    println!();
    println!("📊 Summary:");
    println!("   ✅ OK: {}", report.counts.ok);
    println!("   🔀 Redirected: {}", report.counts.redirected);
    println!("   ❌ Errors: {}", report.counts.error);
    println!("   📋 Total: {}", report.counts.total());
}

fn truncate(url: &str, max: usize) -> String {
    if url.chars().count() > max {
        let head: String = url.chars().take(max).collect();
        format!("{head}...")
    } else {
        url.to_string()
    }
}

fn detail(result: &CheckResult) -> String {
    match result.kind {
        ResultKind::Redirect => format!("-> {}", result.final_url.as_deref().unwrap_or("")),
        ResultKind::Error => format!(
            "{} ({} attempt(s))",
            result.reason.as_deref().unwrap_or(""),
            result.attempts_made
        ),
        ResultKind::Ok if result.checked_url != result.original_url => {
            format!("corrected to {}", result.checked_url)
        }
        ResultKind::Ok => String::new(),
    }
}

fn format_status(kind: ResultKind) -> &'static str {
    match kind {
        ResultKind::Ok => "✅ OK",
        ResultKind::Redirect => "🔀 REDIRECT",
        ResultKind::Error => "❌ ERROR",
    }
}
