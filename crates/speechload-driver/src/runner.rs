// Batch dispatch loop with the failure-stopping control rule.
//
// Design Decision: a batch's in-flight requests always run to
// completion once spawned; a failure stops the run only at the batch
// join point, never mid-flight.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use tokio::task::JoinSet;

use speechload_core::{RequestOutcome, RequestSpec, RunSummary, TextLength};

use crate::client::SpeechClient;
use crate::sink::{AudioSink, DEFAULT_OUTPUT_DIR};

/// Configuration for one run, fully resolved before dispatch starts.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Target server; the speech path suffix is appended if missing.
    pub base_url: String,
    pub text_length: TextLength,
    /// Persist the raw body of each successful response.
    pub save_audio: bool,
    /// Total request count; `None` runs until a batch contains a
    /// failure.
    pub num_requests: Option<u64>,
    /// Concurrent requests per batch, >= 1.
    pub concurrency: u64,
    /// Directory for audio dumps when `save_audio` is set.
    pub output_dir: PathBuf,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:7000".to_string(),
            text_length: TextLength::Medium,
            save_audio: false,
            num_requests: None,
            concurrency: 1,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

/// Drive the whole run and return its summary.
///
/// Requests are issued in consecutive batches of `concurrency`; every
/// batch is fully joined before the failure check, so the run stops
/// at a batch boundary: either the fixed count is exhausted or a
/// completed batch contains a failure. Per-request
/// errors never surface here; the only error path is run setup.
pub async fn run(config: RunConfig) -> Result<RunSummary> {
    let concurrency = config.concurrency.max(1);
    let client = Arc::new(SpeechClient::new(&config.base_url));

    let sink = if config.save_audio {
        let sink = AudioSink::new(&config.output_dir).with_context(|| {
            format!(
                "failed to create output directory {}",
                config.output_dir.display()
            )
        })?;
        Some(Arc::new(sink))
    } else {
        None
    };

    let mode = if config.num_requests.is_some() {
        "fixed"
    } else {
        "continuous"
    };
    println!(
        "Starting {} test with {} concurrent requests",
        mode, concurrency
    );
    println!("Server URL: {}", client.endpoint());
    println!("Text length: {}", config.text_length);
    if let Some(n) = config.num_requests {
        println!("Number of requests: {}", n);
    }
    println!("Concurrency level: {}", concurrency);
    if sink.is_some() {
        println!("Saving audio files to: {}", config.output_dir.display());
    }
    println!("{}", "-".repeat(60));

    let started = Instant::now();
    let mut outcomes: Vec<RequestOutcome> = Vec::new();
    let mut next_sequence: u64 = 1;

    while let Some((first, last)) =
        batch_bounds(next_sequence, concurrency, config.num_requests)
    {
        tracing::debug!(first, last, "dispatching batch");

        let mut batch = JoinSet::new();
        for sequence in first..=last {
            let spec = RequestSpec::new(sequence, config.text_length);
            let client = Arc::clone(&client);
            let sink = sink.clone();
            batch.spawn(async move { dispatch_one(&client, sink.as_deref(), spec).await });
        }

        // Synchronized join point: the next batch never starts before
        // this one fully resolves.
        let mut batch_failed = false;
        while let Some(joined) = batch.join_next().await {
            match joined {
                Ok(outcome) => {
                    batch_failed |= !outcome.success;
                    outcomes.push(outcome);
                }
                Err(e) => {
                    tracing::error!(error = %e, "request task failed to complete");
                    batch_failed = true;
                }
            }
        }

        next_sequence = last + 1;

        if batch_failed {
            println!("Stopping test due to request failure");
            break;
        }
    }

    let total_duration = started.elapsed();
    Ok(RunSummary::from_outcomes(&outcomes, total_duration))
}

/// Sequence range of the next batch, or `None` when a fixed count is
/// exhausted.
fn batch_bounds(next_sequence: u64, concurrency: u64, limit: Option<u64>) -> Option<(u64, u64)> {
    let last = next_sequence + concurrency - 1;
    match limit {
        Some(n) if next_sequence > n => None,
        Some(n) => Some((next_sequence, last.min(n))),
        None => Some((next_sequence, last)),
    }
}

/// Dispatch a single request and record what happened.
///
/// Transport failures are converted into failed outcomes here; this
/// function never fails the run.
async fn dispatch_one(
    client: &SpeechClient,
    sink: Option<&AudioSink>,
    spec: RequestSpec,
) -> RequestOutcome {
    let text = spec.text_length.sample_text();

    println!(
        "[{}] Starting request {} with voice {}",
        wall_clock(),
        spec.sequence,
        spec.voice
    );

    let timestamp = Utc::now();
    let started = Instant::now();

    match client.synthesize(text, spec.voice).await {
        Ok(response) => {
            let duration = started.elapsed();
            let outcome = RequestOutcome::completed(
                spec,
                response.status,
                response.content_type.clone(),
                response.body.len() as u64,
                duration,
                timestamp,
            );

            if outcome.success {
                if let Some(sink) = sink {
                    match sink.save(spec.sequence, spec.voice, &response.body).await {
                        Ok(path) => println!("Saved audio to {}", path.display()),
                        Err(e) => {
                            // The response itself was observed; a failed
                            // dump does not fail the request.
                            eprintln!(
                                "Failed to save audio for request {}: {}",
                                spec.sequence, e
                            );
                            tracing::warn!(
                                sequence = spec.sequence,
                                error = %e,
                                "audio dump failed"
                            );
                        }
                    }
                }
            }

            println!(
                "[{}] Request {} completed: Status {}, Size: {:.1} KB, Duration: {:.2}s",
                wall_clock(),
                spec.sequence,
                response.status,
                response.body.len() as f64 / 1024.0,
                duration.as_secs_f64()
            );

            outcome
        }
        Err(e) => {
            let duration = started.elapsed();
            println!(
                "[{}] Request {} error: {}",
                wall_clock(),
                spec.sequence,
                e
            );
            RequestOutcome::transport_failed(spec, e.to_string(), duration, timestamp)
        }
    }
}

/// Millisecond-precision local wall clock for progress lines.
fn wall_clock() -> String {
    Local::now().format("%H:%M:%S%.3f").to_string()
}
