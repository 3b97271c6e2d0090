//! Maps chat commands onto scheduler operations and phrases the replies.

use std::sync::Arc;

use common::logger::command_span;
use content::ContentKind;
use scheduler::{SessionScheduler, StartOutcome, StopOutcome, session_progress};
use session::SessionKey;
use tokio::time::Instant;
use tracing::info;

use crate::render::{format_duration, kind_title};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Flashcard,
    Interview,
    Stop,
    Status,
    Unknown(String),
}

impl Command {
    /// Parse the leading `/command` of a message, ignoring any `@botname`
    /// suffix and trailing arguments. Plain text yields `None`.
    pub fn parse(text: &str) -> Option<Command> {
        let word = text.split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name).to_ascii_lowercase();

        let cmd = match name.as_str() {
            "start" => Command::Start,
            "help" => Command::Help,
            "flashcard" => Command::Flashcard,
            "interview" => Command::Interview,
            "stop" => Command::Stop,
            "status" => Command::Status,
            _ => Command::Unknown(word.to_string()),
        };
        Some(cmd)
    }

    fn name(&self) -> &str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::Flashcard => "flashcard",
            Command::Interview => "interview",
            Command::Stop => "stop",
            Command::Status => "status",
            Command::Unknown(_) => "unknown",
        }
    }
}

const WELCOME: &str = "Hi! I send study questions on networking, system administration, \
security and troubleshooting computers, printers and cameras.\n\
Send /flashcard to start a flashcard session or /interview for a mock interview. \
/help lists everything I understand.";

const NOT_ACTIVE: &str =
    "There is no session running right now. Send /flashcard or /interview to start one.";

#[derive(Clone)]
pub struct CommandRouter {
    scheduler: Arc<SessionScheduler>,
}

impl CommandRouter {
    pub fn new(scheduler: Arc<SessionScheduler>) -> Self {
        Self { scheduler }
    }

    pub fn scheduler(&self) -> &Arc<SessionScheduler> {
        &self.scheduler
    }

    /// Handle one inbound message for `key` and return the reply text.
    pub fn handle(&self, key: &SessionKey, text: &str) -> String {
        let Some(cmd) = Command::parse(text) else {
            return "I only understand commands. Send /help to see them.".to_string();
        };

        let _span = command_span(key, cmd.name()).entered();

        match cmd {
            Command::Start => WELCOME.to_string(),
            Command::Help => self.help(),
            Command::Flashcard => self.start(key, ContentKind::Flashcard),
            Command::Interview => self.start(key, ContentKind::Interview),
            Command::Stop => self.stop(key),
            Command::Status => self.status(key),
            Command::Unknown(word) => {
                format!("Unknown command {word}. Send /help for the list of commands.")
            }
        }
    }

    fn help(&self) -> String {
        let cfg = self.scheduler.config();
        format!(
            "/flashcard - a study question every {} for {}\n\
             /interview - an interview question every {} for {}\n\
             /status - progress of the current session\n\
             /stop - end the current session",
            format_duration(cfg.flashcard.interval),
            format_duration(cfg.flashcard.deadline),
            format_duration(cfg.interview.interval),
            format_duration(cfg.interview.deadline),
        )
    }

    fn start(&self, key: &SessionKey, kind: ContentKind) -> String {
        match self.scheduler.start(key.clone(), kind) {
            StartOutcome::Started { session_id, timing } => {
                info!(%session_id, %kind, "session started by command");
                format!(
                    "{} session started! I'll send a question every {}. \
                     The session ends automatically after {}. Send /stop to end it now.",
                    kind_title(kind),
                    format_duration(timing.interval),
                    format_duration(timing.deadline),
                )
            }
            StartOutcome::AlreadyActive { kind: running } => format!(
                "You already have a {running} session running. \
                 Send /stop to end it before starting a new one."
            ),
        }
    }

    fn stop(&self, key: &SessionKey) -> String {
        match self.scheduler.stop(key) {
            StopOutcome::Stopped { kind } => format!(
                "{} session stopped. Send /flashcard or /interview to start a new one.",
                kind_title(kind)
            ),
            StopOutcome::NotActive => NOT_ACTIVE.to_string(),
        }
    }

    fn status(&self, key: &SessionKey) -> String {
        let Some(session) = self.scheduler.session(key) else {
            return NOT_ACTIVE.to_string();
        };

        let p = session_progress(
            Instant::now(),
            session.started_at,
            session.interval(),
            session.deadline(),
        );

        let next = match p.next_in {
            Some(d) => format!(" Next question in {}.", format_duration(d)),
            None => " That was the last question.".to_string(),
        };

        format!(
            "{} session: question {} of {}, {} left.{}",
            kind_title(session.kind),
            p.tick_index,
            p.total_ticks,
            format_duration(p.remaining),
            next
        )
    }
}
