mod action;
mod app;
mod app_state;
mod component;
mod components;
mod theme;
mod widgets;

use anyhow::Context;

use card_proto::clock::ClockProducer;
use card_proto::config::Config;
use card_proto::poller::PresencePoller;
use card_proto::presence::LanyardClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = card_proto::platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = data_dir.join("card.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("zephyr-id log: {}", log_path.display());

    tracing::info!("zephyr-id starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("config unreadable, using defaults: {:#}", e);
            Config::default()
        }
    };

    // ── Timers ───────────────────────────────────────────────────────────────
    let client = LanyardClient::new(&config.presence).context("building presence client")?;
    tracing::info!(
        "[presence] polling {} every {:?}",
        client.endpoint(),
        config.presence.poll_interval()
    );
    let (clock, clock_rx) = ClockProducer::spawn(&config.clock);
    let (poller, presence_rx) = PresencePoller::spawn(client, config.presence.poll_interval());

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let result = app::App::new(&config).run(clock_rx, presence_rx).await;

    clock.shutdown().await;
    poller.shutdown().await;
    tracing::info!("zephyr-id stopped");

    result
}
