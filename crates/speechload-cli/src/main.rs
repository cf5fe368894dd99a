// Speechload CLI
//
// Design Decision: clap derive for argument parsing; short and long
// forms for every flag, with an env fallback for the server URL.
// Design Decision: recorded request failures are a reported outcome,
// not a process-level error; the process exits 0 after the summary.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use speechload_core::TextLength;
use speechload_driver::{run, RunConfig, DEFAULT_OUTPUT_DIR};

/// Pressure tester for a speech-synthesis HTTP API.
///
/// Sends batched synthesis requests, cycling through every voice,
/// until a fixed count completes or a failure is observed, then
/// prints latency and throughput statistics.
#[derive(Parser)]
#[command(name = "speechload")]
#[command(version)]
struct Cli {
    /// Server base URL
    #[arg(
        short,
        long,
        env = "SPEECHLOAD_URL",
        default_value = "http://localhost:7000"
    )]
    url: String,

    /// Length of text to use for testing
    #[arg(short, long, value_enum, default_value_t = TextLength::Medium)]
    text_length: TextLength,

    /// Save audio files to the output directory
    #[arg(short, long)]
    save_audio: bool,

    /// Number of requests to send (default: continuous until failure)
    #[arg(short, long)]
    num_requests: Option<u64>,

    /// Number of concurrent requests
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    concurrency: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "speechload_driver=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = RunConfig {
        base_url: cli.url,
        text_length: cli.text_length,
        save_audio: cli.save_audio,
        num_requests: cli.num_requests,
        concurrency: cli.concurrency,
        output_dir: DEFAULT_OUTPUT_DIR.into(),
    };

    let requests_label = match config.num_requests {
        Some(n) => n.to_string(),
        None => "continuous".to_string(),
    };
    let banner = format!(
        "Test Results ({} text, {} requests, {} concurrency)",
        config.text_length, requests_label, config.concurrency
    );

    let summary = run(config).await?;

    println!();
    println!("{}", "=".repeat(60));
    println!("{}", banner);
    println!("{}", "=".repeat(60));
    print!("{}", summary);

    Ok(())
}
