//! Terminal viewer: follows the sample stream and prints the gauges the
//! dashboard would show for the sample under the playback cursor.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sysdash::client::ViewerClient;
use sysdash::history::ViewerState;

#[derive(Parser)]
#[command(name = "sysdash-watch")]
#[command(version = "0.1.0")]
#[command(about = "Follow a sysdash sample stream from the terminal")]
struct Cli {
    /// Streaming endpoint to connect to
    #[arg(short, long, default_value = "ws://127.0.0.1:8000/ws")]
    url: String,

    /// Stop after this many samples (follow forever by default)
    #[arg(short = 'n', long)]
    count: Option<u64>,

    /// Log level
    #[arg(short = 'v', long, default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("sysdash={}", cli.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut client = ViewerClient::connect(&cli.url).await?;
    let mut state = ViewerState::new();
    let mut received: u64 = 0;

    while let Some(sample) = client.next_sample().await? {
        state.on_receive(sample);
        received += 1;

        if let Some(gauges) = state.gauges() {
            println!(
                "[{:>4}] cpu {:5.1}%  mem {:5.1}%  disk {:5.1}%  gpu {:5.1}%  hbm {:5.1}%  training {:>3}%",
                received,
                gauges.cpu_usage,
                gauges.used_memory,
                gauges.used_storage,
                gauges.gpu_usage,
                gauges.hbm_usage,
                gauges.training_progress,
            );
        }

        if cli.count.is_some_and(|limit| received >= limit) {
            break;
        }
    }

    Ok(())
}
