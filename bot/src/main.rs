use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use bot::{
    cli::{Cli, Transport},
    config::AppConfig,
    console::{ConsoleSink, run_console},
    router::CommandRouter,
    telegram::{TelegramClient, TelegramSink, run_telegram_poller},
};
use common::logger::init_logger;
use content::{
    CannedSupplier, ContentSupplier,
    openai::{OpenAiClient, OpenAiSupplier},
};
use scheduler::{DeliverySink, SessionScheduler};
use session::SessionKey;

/// OpenAI when a key is configured, canned questions otherwise.
fn build_supplier(cfg: &AppConfig) -> anyhow::Result<Arc<dyn ContentSupplier>> {
    match &cfg.openai_api_key {
        Some(key) => {
            let client = OpenAiClient::new(
                cfg.openai_base_url.clone(),
                key.clone(),
                cfg.openai_model.clone(),
            )
            .context("failed to build OpenAI client")?;

            info!(model = %client.model(), "using OpenAI content supplier");
            Ok(Arc::new(OpenAiSupplier::new(client)))
        }
        None => {
            info!("OPENAI_API_KEY not set; using canned questions");
            Ok(Arc::new(CannedSupplier))
        }
    }
}

fn build_scheduler(
    cfg: &AppConfig,
    sink: Arc<dyn DeliverySink>,
) -> anyhow::Result<Arc<SessionScheduler>> {
    let supplier = build_supplier(cfg)?;

    let scheduler = SessionScheduler::new(cfg.scheduler.clone(), supplier, sink, cfg.topics.clone())
        .context("invalid scheduler configuration")?;

    Ok(Arc::new(scheduler))
}

async fn run_telegram(cfg: &AppConfig) -> anyhow::Result<()> {
    let token = cfg
        .telegram_bot_token
        .as_deref()
        .context("TELEGRAM_BOT_TOKEN is required for the telegram transport")?;

    let client = TelegramClient::new(&cfg.telegram_api_url, token, cfg.telegram_poll_timeout)
        .context("failed to build Telegram client")?;

    let scheduler = build_scheduler(cfg, Arc::new(TelegramSink::new(client.clone())))?;
    let router = CommandRouter::new(scheduler.clone());

    tokio::select! {
        res = run_telegram_poller(client, router, cfg.telegram_poll_timeout) => res?,
        _ = tokio::signal::ctrl_c() => info!("Shutdown signal received"),
    }

    let stopped = scheduler.shutdown();
    info!(stopped, "sessions cancelled on shutdown");
    Ok(())
}

async fn run_local(cfg: &AppConfig, key: SessionKey) -> anyhow::Result<()> {
    let sink = Arc::new(ConsoleSink::new());
    let scheduler = build_scheduler(cfg, sink.clone())?;
    let router = CommandRouter::new(scheduler.clone());

    tokio::select! {
        res = run_console(router, key, &sink) => res?,
        _ = tokio::signal::ctrl_c() => info!("Shutdown signal received"),
    }

    let stopped = scheduler.shutdown();
    info!(stopped, "sessions cancelled on shutdown");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::from_env().context("invalid configuration")?;

    init_logger("flashcard-bot", cli.json_logs || cfg.json_logs);

    info!(transport = ?cli.transport, "Starting flashcard bot...");

    match cli.transport {
        Transport::Telegram => run_telegram(&cfg).await,
        Transport::Console => run_local(&cfg, SessionKey::new(cli.console_key)).await,
    }
}
