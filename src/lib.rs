//! # Wordlist Harvester
//!
//! Wordlist harvesting tool for penetration testing.
//!
//! ## Features
//!
//! - **Token extraction**: Plain words, hyphenated compounds and
//!   filename-like tokens with recognized extensions
//! - **Flexible sources**: Local files, single URLs, or URL batches
//! - **Parallel fetching**: Fixed-size worker pool with per-source
//!   failure isolation and deterministic output ordering
//! - **Bounded memory**: Large sources are streamed in fixed-size chunks
//!   with token-safe boundary carry-over
//! - **Encoding detection**: Automatic detection and transcoding of
//!   various encodings
//!
//! ## Usage
//!
//! ```bash
//! # Harvest from a local document
//! wordlist-harvester -f notes.txt
//!
//! # Harvest from a single page
//! wordlist-harvester -u https://target.example/about
//!
//! # Harvest a batch of URLs with 10 workers
//! wordlist-harvester -l urls.txt -t 10
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use wordlist_harvester::pipeline::{Pipeline, PipelineConfig};
//! use wordlist_harvester::source::Source;
//!
//! let pipeline = Pipeline::new(PipelineConfig::default()).unwrap();
//! let batch = pipeline.run(vec![
//!     Source::url("https://target.example/about", Vec::new()),
//!     Source::file("notes.txt"),
//! ]);
//! for outcome in &batch.outcomes {
//!     println!("{}: success={}", outcome.source().label(), outcome.is_success());
//! }
//! ```
//!
//! The pipeline never retries a failed source; callers that want retries
//! resubmit the failed sources in a fresh batch.

pub mod cli;
pub mod error;
pub mod extensions;
pub mod extract;
pub mod pipeline;
pub mod report;
pub mod source;

pub use cli::Args;
pub use error::SourceError;
pub use extract::{ExtractionResult, Extractor};
pub use pipeline::{BatchResult, FetchOutcome, Pipeline, PipelineConfig};
pub use source::Source;
