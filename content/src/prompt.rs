//! Prompt construction and reply parsing for LLM-backed suppliers.

use crate::types::{ContentKind, ContentUnit};

const ANSWER_PREFIX: &str = "answer:";
const QUESTION_PREFIX: &str = "question:";

pub fn build_prompt(kind: ContentKind, topic: &str) -> String {
    match kind {
        ContentKind::Flashcard => format!(
            "Create one short study question about \"{topic}\" for someone learning IT support \
             and system administration. Put the question on the first line, then a line \
             starting with \"Answer:\" holding a concise answer."
        ),
        ContentKind::Interview => format!(
            "You are interviewing a candidate for an IT support and system administration role. \
             Ask one short interview question about \"{topic}\". Reply with the question only."
        ),
    }
}

/// Split a model reply into a [`ContentUnit`].
///
/// Everything before the first `Answer:` line is the question (an optional
/// `Question:` prefix is dropped); the rest is the answer. Returns `None` for
/// a blank reply.
pub fn parse_reply(reply: &str) -> Option<ContentUnit> {
    let mut question = Vec::new();
    let mut answer: Option<Vec<&str>> = None;

    for line in reply.lines() {
        let trimmed = line.trim();

        if let Some(lines) = answer.as_mut() {
            lines.push(trimmed);
            continue;
        }

        if let Some(rest) = strip_prefix_ci(trimmed, ANSWER_PREFIX) {
            answer = Some(vec![rest.trim()]);
        } else {
            question.push(strip_prefix_ci(trimmed, QUESTION_PREFIX).unwrap_or(trimmed).trim());
        }
    }

    let question = question.join("\n").trim().to_string();
    let answer = answer
        .map(|lines| lines.join("\n").trim().to_string())
        .filter(|a| !a.is_empty());

    match (question.is_empty(), answer) {
        (true, None) => None,
        // A reply with only an answer line still carries something to show.
        (true, Some(a)) => Some(ContentUnit::question(a)),
        (false, answer) => Some(ContentUnit::new(question, answer)),
    }
}

fn strip_prefix_ci<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&s[prefix.len()..])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompts_mention_the_topic() {
        let p = build_prompt(ContentKind::Flashcard, "Windows Server 2019");
        assert!(p.contains("\"Windows Server 2019\""));
        assert!(p.contains("Answer:"));

        let p = build_prompt(ContentKind::Interview, "camera troubleshooting");
        assert!(p.contains("\"camera troubleshooting\""));
        assert!(!p.contains("Answer:"));
    }

    #[test]
    fn question_and_answer_are_split() {
        let unit = parse_reply("Question: What port does SSH use?\nAnswer: 22/tcp").unwrap();
        assert_eq!(unit.question, "What port does SSH use?");
        assert_eq!(unit.answer.as_deref(), Some("22/tcp"));
    }

    #[test]
    fn multi_line_answer_is_kept() {
        let unit = parse_reply("What is RAID 1?\n\nANSWER: Mirroring.\nTwo disks hold the same data.")
            .unwrap();
        assert_eq!(unit.question, "What is RAID 1?");
        assert_eq!(
            unit.answer.as_deref(),
            Some("Mirroring.\nTwo disks hold the same data.")
        );
    }

    #[test]
    fn plain_reply_is_a_question() {
        let unit = parse_reply("  How would you reset a print spooler?  ").unwrap();
        assert_eq!(unit.question, "How would you reset a print spooler?");
        assert_eq!(unit.answer, None);
    }

    #[test]
    fn blank_reply_is_rejected() {
        assert!(parse_reply("").is_none());
        assert!(parse_reply(" \n \n").is_none());
        assert!(parse_reply("Answer:").is_none());
    }

    #[test]
    fn non_ascii_lines_do_not_panic() {
        let unit = parse_reply("Câu hỏi: mạng máy tính là gì?").unwrap();
        assert_eq!(unit.question, "Câu hỏi: mạng máy tính là gì?");
    }
}
