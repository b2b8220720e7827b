use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval, sleep};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use chanstore_core::DataStore;

mod monitor;
mod producer;
mod sim;

use producer::ChannelProducer;
use sim::{ScopeSettings, SimulatedScope};

/// Minimum producer period accepted by the simulated instrument.
const MIN_UPDATE_MS: u64 = 10;

#[derive(Parser, Debug)]
#[command(version, about = "Simulated instrument feeding the shared channel store")]
struct Args {
    /// Channel address prefix
    #[arg(long, default_value = "MTEST:")]
    prefix: String,

    /// Producer period in milliseconds
    #[arg(long, default_value_t = 100)]
    update_ms: u64,

    /// Consumer period in milliseconds
    #[arg(long, default_value_t = 500)]
    read_ms: u64,

    /// Run time in seconds
    #[arg(long, default_value_t = 3)]
    duration_secs: u64,

    /// Waveform length
    #[arg(long, default_value_t = 1000)]
    points: usize,

    /// Noise amplitude added to the traces
    #[arg(long, default_value_t = 0.2)]
    noise: f64,
}

/// producer を周期実行し、停止通知で自分のチャンネルを片付ける
async fn producer_loop(
    mut producer: Box<dyn ChannelProducer>,
    period: Duration,
    mut stop: watch::Receiver<bool>,
) {
    let store = DataStore::instance();
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = producer.publish(store).await {
                    warn!(producer = producer.name(), error = %e, "publish failed");
                }
            }
            _ = stop.changed() => break,
        }
    }
    producer.shutdown(store).await;
}

async fn monitor_loop(prefix: String, period: Duration, mut stop: watch::Receiver<bool>) {
    let store = DataStore::instance();
    let mut ticker = interval(period);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let readings = monitor::scan(store, &prefix);
                info!(channels = readings.len(), "scan complete");
            }
            _ = stop.changed() => break,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chanstore=info,chanstore_core=info".into()),
        )
        .init();

    let args = Args::parse();
    anyhow::ensure!(args.points > 0, "--points must be positive");
    anyhow::ensure!(args.read_ms > 0, "--read-ms must be positive");

    let update_ms = args.update_ms.max(MIN_UPDATE_MS);
    info!(prefix = %args.prefix, update_ms, read_ms = args.read_ms, "starting");

    let settings = ScopeSettings {
        points: args.points,
        noise_amplitude: args.noise,
        ..Default::default()
    };
    let scope = SimulatedScope::new(args.prefix.clone(), settings);

    let (stop_tx, stop_rx) = watch::channel(false);
    let producer = tokio::spawn(producer_loop(
        Box::new(scope),
        Duration::from_millis(update_ms),
        stop_rx.clone(),
    ));
    let monitor = tokio::spawn(monitor_loop(
        args.prefix.clone(),
        Duration::from_millis(args.read_ms),
        stop_rx,
    ));

    tokio::select! {
        _ = sleep(Duration::from_secs(args.duration_secs)) => {}
        _ = tokio::signal::ctrl_c() => info!("interrupted"),
    }

    stop_tx.send(true)?;
    monitor.await?;
    producer.await?;

    info!(remaining = DataStore::instance().addresses().len(), "stopped");
    Ok(())
}
