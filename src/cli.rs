//! Command-line interface definition for wordlist-harvester
//!
//! Provides argument parsing and validation for the wordlist harvesting tool.

use clap::Parser;
use reqwest::header::{HeaderName, HeaderValue};
use std::path::PathBuf;

use crate::error::SourceError;
use crate::pipeline::{DEFAULT_TIMEOUT_SECS, DEFAULT_WORKERS};

/// Wordlist harvester for penetration testing
///
/// Extract words, hyphenated compounds and filename tokens from a local
/// file, a URL, or a batch of URLs fetched in parallel.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "wordlist-harvester",
    author = "m0h1nd4",
    version,
    about = "Harvest wordlists from files and web pages for penetration testing",
    long_about = r#"
╔══════════════════════════════════════════════════════════════╗
║              WORDLIST-HARVESTER v1.0.0                       ║
║     Words, Compounds and Filenames from Files & URLs         ║
║               For Penetration Testing                        ║
╚══════════════════════════════════════════════════════════════╝

Extract plain words, hyphenated compounds and filename-like tokens with
recognized extensions from documents or web pages, and turn them into
wordlists for recon and brute-force tooling.

EXAMPLES:
    # Harvest from a local document
    wordlist-harvester -f notes.txt

    # Harvest from a single page
    wordlist-harvester -u https://target.example/about

    # Harvest a batch of URLs with 10 workers and custom headers
    wordlist-harvester -l urls.txt -t 10 -H "Cookie:session=abc,X-Api-Key:k"

    # Write tokens to a file instead of stdout
    wordlist-harvester -u https://target.example -o tokens.txt
"#,
    after_help = "For more information, visit: https://github.com/m0h1nd4/wordlist-harvester"
)]
#[command(group(
    clap::ArgGroup::new("input")
        .required(true)
        .args(["file", "url", "url_list"])
))]
pub struct Args {
    /// Path to a local text file to harvest
    #[arg(short, long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// URL to retrieve text from
    #[arg(short, long, value_name = "URL")]
    pub url: Option<String>,

    /// Path to a file containing one URL per line
    #[arg(short = 'l', long, value_name = "PATH")]
    pub url_list: Option<PathBuf>,

    /// Number of parallel workers for URL fetching
    #[arg(short = 't', long, value_name = "NUM", default_value_t = DEFAULT_WORKERS)]
    pub threads: usize,

    /// Custom HTTP headers in the format 'key1:value1,key2:value2'
    #[arg(short = 'H', long, value_name = "HEADERS")]
    pub headers: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Output file for harvested tokens (default: stdout)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Streaming chunk size (e.g. "1MB")
    #[arg(long, value_name = "SIZE", default_value = "1MB")]
    pub chunk_size: String,

    /// Sources at or below this size are loaded in one read (e.g. "50MB")
    #[arg(long, value_name = "SIZE", default_value = "50MB")]
    pub whole_read_limit: String,

    /// Quiet mode - token output only
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,

    /// Verbose mode - detailed logging
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Parse the custom header string into key/value pairs.
    ///
    /// Entries are comma-separated; each splits on the first ':' so values
    /// may themselves contain colons. A malformed entry, or a name/value
    /// the transport would reject, is an error rather than skipped.
    pub fn parse_headers(&self) -> Result<Vec<(String, String)>, SourceError> {
        let Some(ref spec) = self.headers else {
            return Ok(Vec::new());
        };

        let mut headers = Vec::new();
        for entry in spec.split(',') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            match entry.split_once(':') {
                Some((key, value)) if !key.trim().is_empty() => {
                    let (key, value) = (key.trim(), value.trim());
                    if HeaderName::from_bytes(key.as_bytes()).is_err()
                        || HeaderValue::from_str(value).is_err()
                    {
                        return Err(SourceError::InvalidHeaderSpec {
                            entry: entry.to_string(),
                        });
                    }
                    headers.push((key.to_string(), value.to_string()));
                }
                _ => {
                    return Err(SourceError::InvalidHeaderSpec {
                        entry: entry.to_string(),
                    });
                }
            }
        }
        Ok(headers)
    }

    /// Parse chunk size string to bytes.
    pub fn parse_chunk_size(&self) -> anyhow::Result<usize> {
        parse_size(&self.chunk_size)
    }

    /// Parse whole-read limit string to bytes.
    pub fn parse_whole_read_limit(&self) -> anyhow::Result<u64> {
        Ok(parse_size(&self.whole_read_limit)? as u64)
    }
}

/// Parse human-readable size string to bytes
fn parse_size(size_str: &str) -> anyhow::Result<usize> {
    let size_str = size_str.trim().to_uppercase();

    let (num_str, multiplier) = if size_str.ends_with("GB") {
        (&size_str[..size_str.len() - 2], 1024 * 1024 * 1024)
    } else if size_str.ends_with("MB") {
        (&size_str[..size_str.len() - 2], 1024 * 1024)
    } else if size_str.ends_with("KB") {
        (&size_str[..size_str.len() - 2], 1024)
    } else if size_str.ends_with('B') {
        (&size_str[..size_str.len() - 1], 1)
    } else {
        (size_str.as_str(), 1)
    };

    let num: usize = num_str
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid size format: '{}'", size_str))?;

    Ok(num * multiplier)
}
