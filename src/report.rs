//! Result aggregation and output formatting
//!
//! Merges successful outcomes in submission order and emits the token groups
//! as one buffered write to the caller's sink. Failures are reported on
//! stderr through the styled helpers and never interleave with token output.

use std::io::{self, Write};
use std::time::Duration;

use colored::*;

use crate::extract::ExtractionResult;
use crate::pipeline::{BatchResult, FetchOutcome};

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔══════════════════════════════════════════════════════════════╗
║              WORDLIST-HARVESTER v1.0.0                       ║
║     Words, Compounds and Filenames from Files & URLs         ║
║               For Penetration Testing                        ║
╚══════════════════════════════════════════════════════════════╝
"#;
    eprintln!("{}", banner.green());
}

/// Print a section header.
pub fn print_header(text: &str) {
    eprintln!("\n{} {}", "▶".green(), text.green().bold());
}

/// Print an info message.
pub fn print_info(text: &str) {
    eprintln!("  {} {}", "ℹ".cyan(), text);
}

/// Print a success message.
pub fn print_success(text: &str) {
    eprintln!("  {} {}", "✔".green(), text.green());
}

/// Print a warning message.
pub fn print_warning(text: &str) {
    eprintln!("  {} {}", "⚠".yellow(), text.yellow());
}

/// Print an error message.
pub fn print_error(text: &str) {
    eprintln!("  {} {}", "✖".red(), text.red());
}

/// Merge all successful results in submission order.
pub fn merge_successes(batch: &BatchResult) -> ExtractionResult {
    let mut merged = ExtractionResult::default();
    for outcome in &batch.outcomes {
        if let FetchOutcome::Success { result, .. } = outcome {
            merged.extend(result.clone());
        }
    }
    merged
}

/// Render the merged token groups.
///
/// The three main groups always appear; the derived underscore group only
/// when it has members.
pub fn format_tokens(merged: &ExtractionResult) -> String {
    // Rough preallocation: tokens average well under 32 bytes
    let mut out = String::with_capacity(32 * merged.token_count() + 64);

    push_group(&mut out, "[words]", &merged.words);
    push_group(&mut out, "[hyphenated]", &merged.hyphenated);
    push_group(&mut out, "[filenames]", &merged.filenames);
    if !merged.underscore_parts.is_empty() {
        push_group(&mut out, "[underscore-parts]", &merged.underscore_parts);
    }

    out
}

fn push_group(out: &mut String, label: &str, tokens: &[String]) {
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(label);
    out.push('\n');
    for token in tokens {
        out.push_str(token);
        out.push('\n');
    }
}

/// Write the merged token groups as a single buffered write plus one flush.
pub fn write_tokens<W: Write>(batch: &BatchResult, sink: &mut W) -> io::Result<()> {
    let merged = merge_successes(batch);
    sink.write_all(format_tokens(&merged).as_bytes())?;
    sink.flush()
}

/// Report every failed source with its identifier and cause.
pub fn report_failures(batch: &BatchResult) {
    let failures: Vec<&FetchOutcome> = batch
        .outcomes
        .iter()
        .filter(|o| !o.is_success())
        .collect();
    if failures.is_empty() {
        return;
    }

    print_header(&format!("{} source(s) failed", failures.len()));
    for outcome in failures {
        if let FetchOutcome::Failure { source, error } = outcome {
            print_error(&format!("{}: [{}] {}", source.label(), error.kind_name(), error));
        }
    }
}

/// Print the batch summary.
pub fn print_summary(batch: &BatchResult, elapsed: Duration) {
    let merged = merge_successes(batch);
    let ok = batch.len() - batch.failure_count();

    print_header("Harvest complete");
    print_info(&format!("Sources:          {}/{} succeeded", ok, batch.len()));
    print_info(&format!("Words:            {}", merged.words.len()));
    print_info(&format!("Hyphenated:       {}", merged.hyphenated.len()));
    print_info(&format!("Filenames:        {}", merged.filenames.len()));
    print_info(&format!("Underscore parts: {}", merged.underscore_parts.len()));
    print_info(&format!("Duration:         {:.2}s", elapsed.as_secs_f64()));
}
