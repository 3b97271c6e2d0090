//! User-facing text for units, notices and durations.

use std::time::Duration;

use content::{ContentKind, ContentUnit};
use scheduler::SessionNotice;

pub fn render_unit(unit: &ContentUnit) -> String {
    match &unit.answer {
        Some(answer) => format!("❓ {}\n\n💡 {}", unit.question, answer),
        None => format!("❓ {}", unit.question),
    }
}

pub fn render_notice(notice: &SessionNotice) -> String {
    match notice {
        SessionNotice::DeadlineReached { kind, delivered } => format!(
            "Your {kind} session has ended after {delivered} {}. Send /{kind} to keep practising.",
            plural(*delivered, "question", "questions"),
        ),
    }
}

/// Capitalised kind, for the start of a sentence.
pub fn kind_title(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Flashcard => "Flashcard",
        ContentKind::Interview => "Interview",
    }
}

/// "30 seconds", "10 minutes", "1 minute 5 seconds".
pub fn format_duration(d: Duration) -> String {
    let total = d.as_secs();
    let (minutes, seconds) = (total / 60, total % 60);

    match (minutes, seconds) {
        (0, s) => format!("{s} {}", plural(s, "second", "seconds")),
        (m, 0) => format!("{m} {}", plural(m, "minute", "minutes")),
        (m, s) => format!(
            "{m} {} {s} {}",
            plural(m, "minute", "minutes"),
            plural(s, "second", "seconds")
        ),
    }
}

fn plural(n: u64, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 { one } else { many }
}
