//! Fetch coordinator
//!
//! Schedules source readers across a fixed-size worker pool and collects one
//! outcome per source. Outcomes arrive in completion order over a channel and
//! are reassembled into submission order, so batch output is deterministic
//! regardless of which worker finishes first. A failing source never cancels
//! or delays its siblings.
//!
//! The coordinator performs no retries; a caller that wants them resubmits
//! the failed sources itself.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::SourceError;
use crate::extract::{ExtractionResult, Extractor};
use crate::source::{self, Source};

const USER_AGENT: &str = concat!("wordlist-harvester/", env!("CARGO_PKG_VERSION"));

/// Default number of in-flight sources.
pub const DEFAULT_WORKERS: usize = 5;

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// The per-source result: merged extraction output or a typed failure.
#[derive(Debug)]
pub enum FetchOutcome {
    Success {
        source: Source,
        result: ExtractionResult,
    },
    Failure {
        source: Source,
        error: SourceError,
    },
}

impl FetchOutcome {
    pub fn source(&self) -> &Source {
        match self {
            Self::Success { source, .. } | Self::Failure { source, .. } => source,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Outcomes for a whole batch, in submission order.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub outcomes: Vec<FetchOutcome>,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success()).count()
    }
}

/// Pipeline configuration. Constructed once and passed in; there is no
/// process-wide pattern or session state.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Maximum sources in flight. Validated to at least 1.
    pub workers: usize,
    /// Per-request connect/read timeout in seconds.
    pub timeout_secs: u64,
    /// Streaming chunk size in bytes.
    pub chunk_size: usize,
    /// Sources at or below this many bytes are loaded as one chunk.
    pub whole_read_limit: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            chunk_size: source::DEFAULT_CHUNK_SIZE,
            whole_read_limit: source::DEFAULT_WHOLE_READ_LIMIT,
        }
    }
}

/// The content-acquisition-and-extraction pipeline.
///
/// Holds the compiled extractor and a pooled HTTP client shared by all
/// workers; both are thread-safe reads from the workers' point of view.
pub struct Pipeline {
    config: PipelineConfig,
    extractor: Extractor,
    client: Client,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            extractor: Extractor::new()?,
            client,
        })
    }

    /// Run extraction for every source, at most `workers` in flight.
    ///
    /// Returns exactly one outcome per source, in submission order. A
    /// single-source batch goes through the same path with one worker.
    pub fn run(&self, sources: Vec<Source>) -> BatchResult {
        let total = sources.len();
        if total == 0 {
            return BatchResult::default();
        }
        let workers = self.config.workers.max(1).min(total);

        let (job_tx, job_rx) = crossbeam_channel::unbounded::<(usize, Source)>();
        let (outcome_tx, outcome_rx) = crossbeam_channel::unbounded::<(usize, FetchOutcome)>();

        for job in sources.into_iter().enumerate() {
            // Receiver outlives this loop, send cannot fail
            let _ = job_tx.send(job);
        }
        drop(job_tx);

        std::thread::scope(|scope| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let outcome_tx = outcome_tx.clone();
                scope.spawn(move || {
                    for (index, src) in job_rx.iter() {
                        let outcome = self.process_source(src);
                        if outcome_tx.send((index, outcome)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(outcome_tx);

            // Re-sort completion order back into submission order
            let mut slots: Vec<Option<FetchOutcome>> = (0..total).map(|_| None).collect();
            for (index, outcome) in outcome_rx.iter() {
                slots[index] = Some(outcome);
            }
            BatchResult {
                outcomes: slots.into_iter().flatten().collect(),
            }
        })
    }

    fn process_source(&self, src: Source) -> FetchOutcome {
        log::debug!("processing {}", src.label());
        match self.extract_source(&src) {
            Ok(result) => {
                log::debug!("{}: {} tokens", src.label(), result.token_count());
                FetchOutcome::Success {
                    source: src,
                    result,
                }
            }
            Err(error) => {
                log::debug!("{}: {error}", src.label());
                FetchOutcome::Failure { source: src, error }
            }
        }
    }

    /// Accumulate extraction over a source's chunk stream. Any mid-stream
    /// failure discards the partial result so a truncated token list is
    /// never reported as a success.
    fn extract_source(&self, src: &Source) -> Result<ExtractionResult, SourceError> {
        let stream = match src {
            Source::File { path } => source::open_file(
                path,
                self.config.chunk_size,
                self.config.whole_read_limit,
            )?,
            Source::Url { url, headers } => source::open_url(
                &self.client,
                url,
                headers,
                self.config.chunk_size,
                self.config.whole_read_limit,
                self.config.timeout_secs,
            )?,
        };

        let mut accumulated = ExtractionResult::default();
        for chunk in stream {
            let chunk = chunk?;
            accumulated.extend(self.extractor.extract(&chunk.text));
            if chunk.is_final {
                break;
            }
        }
        Ok(accumulated)
    }
}
