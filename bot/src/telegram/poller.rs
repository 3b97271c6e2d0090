//! Telegram long-poll loop.
//!
//! Fetches updates, routes each text message through the command router and
//! replies in the same chat. The offset is advanced past every update seen,
//! routed or not, so nothing is processed twice.

use std::time::Duration;

use session::SessionKey;
use tracing::{info, warn};

use super::client::TelegramClient;
use crate::router::CommandRouter;

const ERROR_BACKOFF: Duration = Duration::from_secs(3);

/// Runs until the surrounding task is dropped.
pub async fn run_telegram_poller(
    client: TelegramClient,
    router: CommandRouter,
    poll_timeout: Duration,
) -> anyhow::Result<()> {
    let mut offset: Option<i64> = None;

    info!(
        poll_timeout_s = poll_timeout.as_secs(),
        "telegram poller started"
    );

    loop {
        let updates = match client.get_updates(offset, poll_timeout).await {
            Ok(u) => u,
            Err(e) => {
                warn!(error = %e, "getUpdates failed; backing off");
                tokio::time::sleep(ERROR_BACKOFF).await;
                continue;
            }
        };

        for update in updates {
            offset = Some(update.update_id + 1);

            let Some(message) = update.message else {
                continue;
            };
            let Some(text) = message.text.as_deref() else {
                continue;
            };

            let chat_id = message.chat.id;
            let reply = router.handle(&SessionKey::from(chat_id), text);

            if let Err(e) = client.send_message(chat_id, &reply).await {
                warn!(chat_id, error = %e, "failed to send command reply");
            }
        }
    }
}
