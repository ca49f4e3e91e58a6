//! Wordlist Harvester - extract wordlists from files and web pages
//!
//! Main entry point for the command-line application.

use clap::Parser;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::Path;
use std::process;
use std::time::Instant;

use wordlist_harvester::cli::Args;
use wordlist_harvester::pipeline::{Pipeline, PipelineConfig};
use wordlist_harvester::report::{self, print_banner, print_error, print_info};
use wordlist_harvester::source::Source;

fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    // Set up logging
    if args.verbose {
        std::env::set_var("RUST_LOG", "debug");
    } else if !args.quiet {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    // Run the application
    match run(args) {
        Ok(had_failures) => {
            if had_failures {
                process::exit(1);
            }
        }
        Err(e) => {
            print_error(&format!("{}", e));

            // Print chain of errors
            let mut source = e.source();
            while let Some(err) = source {
                print_error(&format!("  Caused by: {}", err));
                source = err.source();
            }

            process::exit(1);
        }
    }
}

fn run(args: Args) -> anyhow::Result<bool> {
    // Print banner unless quiet mode
    if !args.quiet {
        print_banner();
    }

    let headers = args.parse_headers()?;
    let sources = collect_sources(&args, &headers)?;

    if args.threads == 0 {
        anyhow::bail!("--threads must be at least 1");
    }

    let config = PipelineConfig {
        workers: args.threads,
        timeout_secs: args.timeout,
        chunk_size: args.parse_chunk_size()?,
        whole_read_limit: args.parse_whole_read_limit()?,
    };

    if !args.quiet {
        print_info(&format!(
            "Harvesting {} source(s) with {} worker(s)",
            sources.len(),
            config.workers.min(sources.len())
        ));
    }

    let pipeline = Pipeline::new(config)?;

    let started = Instant::now();
    let batch = pipeline.run(sources);
    let elapsed = started.elapsed();

    // Tokens to the sink, failures to stderr, never interleaved
    match &args.output {
        Some(path) => {
            let mut sink = BufWriter::new(File::create(path)?);
            report::write_tokens(&batch, &mut sink)?;
            if !args.quiet {
                report::print_success(&format!("Tokens written to: {:?}", path));
            }
        }
        None => {
            let stdout = io::stdout();
            let mut sink = BufWriter::new(stdout.lock());
            report::write_tokens(&batch, &mut sink)?;
        }
    }

    report::report_failures(&batch);
    if !args.quiet {
        report::print_summary(&batch, elapsed);
    }

    Ok(batch.failure_count() > 0)
}

/// Turn CLI input into the ordered source list.
fn collect_sources(args: &Args, headers: &[(String, String)]) -> anyhow::Result<Vec<Source>> {
    if let Some(ref path) = args.file {
        return Ok(vec![Source::file(path)]);
    }

    if let Some(ref raw) = args.url {
        return Ok(vec![Source::url(validate_url(raw)?, headers.to_vec())]);
    }

    if let Some(ref list) = args.url_list {
        return sources_from_list(list, headers);
    }

    anyhow::bail!("provide a file path (-f), a URL (-u), or a URL list (-l)");
}

fn sources_from_list(path: &Path, headers: &[(String, String)]) -> anyhow::Result<Vec<Source>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("cannot read URL list {:?}: {}", path, e))?;

    let mut sources = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        sources.push(Source::url(validate_url(line)?, headers.to_vec()));
    }

    if sources.is_empty() {
        anyhow::bail!("URL list {:?} contains no URLs", path);
    }
    Ok(sources)
}

fn validate_url(raw: &str) -> anyhow::Result<String> {
    let parsed = url::Url::parse(raw).map_err(|e| anyhow::anyhow!("invalid URL '{raw}': {e}"))?;
    match parsed.scheme() {
        "http" | "https" => Ok(raw.to_string()),
        other => anyhow::bail!("unsupported URL scheme '{other}' in '{raw}'"),
    }
}
