//! Local transport: one session key, commands on stdin, output on stdout.

use anyhow::Context;
use async_trait::async_trait;
use content::ContentUnit;
use scheduler::{DeliveryError, DeliverySink, SessionNotice};
use session::SessionKey;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tokio::sync::Mutex;
use tracing::info;

use crate::render::{render_notice, render_unit};
use crate::router::CommandRouter;

pub struct ConsoleSink {
    out: Mutex<Stdout>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            out: Mutex::new(tokio::io::stdout()),
        }
    }

    async fn write(&self, key: &SessionKey, text: &str) -> Result<(), DeliveryError> {
        let mut out = self.out.lock().await;
        out.write_all(format!("[{key}] {text}\n\n").as_bytes())
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;
        out.flush()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DeliverySink for ConsoleSink {
    async fn deliver(&self, key: &SessionKey, unit: &ContentUnit) -> Result<(), DeliveryError> {
        self.write(key, &render_unit(unit)).await
    }

    async fn notify(&self, key: &SessionKey, notice: &SessionNotice) -> Result<(), DeliveryError> {
        self.write(key, &render_notice(notice)).await
    }
}

/// Feed stdin lines to the router until EOF, printing each reply.
pub async fn run_console(
    router: CommandRouter,
    key: SessionKey,
    sink: &ConsoleSink,
) -> anyhow::Result<()> {
    info!(session_key = %key, "console transport started; type /help");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }

        let reply = router.handle(&key, &line);
        sink.write(&key, &reply)
            .await
            .context("failed to write reply to stdout")?;
    }

    info!("stdin closed; leaving console transport");
    Ok(())
}
