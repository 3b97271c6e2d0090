use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Transport {
    /// Long-poll the Telegram Bot API.
    Telegram,
    /// Read commands from stdin, print deliveries to stdout.
    Console,
}

#[derive(Debug, Parser)]
#[command(name = "flashcard-bot", version, about = "Timed flashcard and interview sessions")]
pub struct Cli {
    /// Which chat transport to run
    #[arg(long, value_enum, default_value_t = Transport::Telegram)]
    pub transport: Transport,

    /// Emit JSON logs (also enabled by APP_ENV=production)
    #[arg(long)]
    pub json_logs: bool,

    /// Session key used by the console transport
    #[arg(long, default_value = "console")]
    pub console_key: String,
}
