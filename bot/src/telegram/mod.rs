//! Telegram Bot API transport: long-polling for commands, `sendMessage`
//! for replies and session output.

pub mod client;
pub mod errors;
pub mod poller;
pub mod sink;
pub mod types;

pub use client::TelegramClient;
pub use errors::TelegramError;
pub use poller::run_telegram_poller;
pub use sink::TelegramSink;
