use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use alerts::{LogNotifier, TelegramNotifier};
use common::console::{self, Tone};
use common::{Config, Notifier, OperatingMode};
use engine::{executor_for, BinanceFuturesClient, PollingScheduler};
use strategy::{BotFileConfig, MaRsiStrategy, Strategy};

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env().unwrap_or_else(|e| panic!("ERROR: {e}"));
    let file_cfg = if cfg.bot_config_path_explicit {
        BotFileConfig::load(&cfg.bot_config_path)
    } else {
        BotFileConfig::load_or_default(&cfg.bot_config_path)
    }
    .unwrap_or_else(|e| panic!("Failed to load bot config '{}': {e}", cfg.bot_config_path));

    info!(
        mode = %cfg.mode,
        pairs = ?file_cfg.trading.pairs,
        interval = %file_cfg.trading.interval,
        "futuresbot starting"
    );

    // ── Binance client (market data + order submission) ──────────────────────
    let mut client = BinanceFuturesClient::with_base_url(&cfg.binance_base_url)
        .unwrap_or_else(|e| panic!("Failed to build Binance client: {e}"));
    if let (Some(key), Some(secret)) = (&cfg.binance_api_key, &cfg.binance_secret) {
        client = client.with_credentials(key, secret);
    }
    let client = Arc::new(client);

    // ── Executor (chosen once from TRADING_MODE) ─────────────────────────────
    match cfg.mode {
        OperatingMode::Live => {
            warn!(base_url = %client.base_url(), "Live mode: orders WILL be submitted");
        }
        OperatingMode::Simulate => info!("Simulate mode: no orders will be submitted"),
    }
    let executor = executor_for(cfg.mode, client.clone());

    // ── Notifications ─────────────────────────────────────────────────────────
    let notifier: Arc<dyn Notifier> = match &cfg.telegram_token {
        Some(token) => Arc::new(TelegramNotifier::new(token, &cfg.telegram_chat_ids)),
        None => {
            info!("TELEGRAM_TOKEN not set, alerts go to the log only");
            Arc::new(LogNotifier)
        }
    };

    // ── Strategy + scheduler ──────────────────────────────────────────────────
    let strategy = MaRsiStrategy::new(&file_cfg.strategy);
    info!(strategy = %strategy.name(), "Strategy ready");

    let scheduler = PollingScheduler::new(
        file_cfg.trading,
        client,
        Box::new(strategy),
        notifier,
        executor,
    );

    console::say(
        Tone::Info,
        &format!("Starting Binance futures trading bot ({} mode)...", cfg.mode),
    );

    // Runs until Ctrl-C
    tokio::select! {
        _ = scheduler.run() => {}
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                warn!(error = %e, "Failed to listen for shutdown signal");
            }
            info!("Shutdown signal received. Exiting.");
        }
    }
}
