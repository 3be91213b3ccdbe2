use super::{LineFormat, line_regex};
use crate::{fields::ParsedLine, level::LogLevel};
use lazy_static::lazy_static;
use regex::Regex;

const MIN_TRAILING_FIELDS: usize = 2;
const MAX_TRAILING_FIELDS: usize = 4;

lazy_static! {
    // ids are decimal or 0x-prefixed hex, either combined `[pid:tid]` or as two brackets
    static ref HEAD_RE: Regex = line_regex(
        r"(?x)
          ^(?P<ts>{TS})\s*
          \[(?P<level>[A-Za-z]+)\]\s*
          \[(?P<module>[^\]]*)\]\s*
          (?:
              \[(?P<pid>(?:0x)?[0-9A-Fa-f]+)[:/](?P<tid>(?:0x)?[0-9A-Fa-f]+)\]
            | \[(?P<pid_only>(?:0x)?[0-9A-Fa-f]+)\]\s*\[(?P<tid_only>(?:0x)?[0-9A-Fa-f]+)\]
          )\s*
          \[(?P<func>[^\]:]+):(?P<line>\d+)\]
          (?P<rest>.*)$"
    );

    static ref BRACKET_GROUP_RE: Regex = Regex::new(r"^\s*\[([^\]]*)\]").unwrap();

    static ref ACCOUNT_RE: Regex =
        Regex::new(r"(?i)^acc(?:ount)?[:=]\s*([^/\s]+)\s*/\s*user[:=]\s*(.+)$").unwrap();
    static ref PROJECT_RE: Regex = Regex::new(r"(?i)^proj(?:ect)?[:=]\s*(.+)$").unwrap();
    static ref USER_ID_RE: Regex = Regex::new(r"(?i)^(?:uid|user_?id)[:=]\s*(.+)$").unwrap();
}

/// what a trailing metadata bracket turned out to hold
#[derive(Debug, PartialEq, Eq)]
enum TrailingField<'a> {
    Account { account: &'a str, user: &'a str },
    Project(&'a str),
    UserId(&'a str),
    Placeholder,
    Message(&'a str),
}

fn classify(field: &str) -> TrailingField<'_> {
    let field = field.trim();

    if matches!(
        field.to_ascii_lowercase().as_str(),
        "" | "-" | "n/a" | "null" | "none"
    ) {
        return TrailingField::Placeholder;
    }
    if let Some(caps) = ACCOUNT_RE.captures(field) {
        let (Some(account), Some(user)) = (caps.get(1), caps.get(2)) else {
            return TrailingField::Message(field);
        };
        return TrailingField::Account {
            account: account.as_str(),
            user: user.as_str().trim(),
        };
    }
    if let Some(project) = PROJECT_RE.captures(field).and_then(|c| c.get(1)) {
        return TrailingField::Project(project.as_str().trim());
    }
    if let Some(uid) = USER_ID_RE.captures(field).and_then(|c| c.get(1)) {
        return TrailingField::UserId(uid.as_str().trim());
    }
    TrailingField::Message(field)
}

/// peel up to `MAX_TRAILING_FIELDS` leading bracket groups off `rest`
fn split_trailing(mut rest: &str) -> (Vec<&str>, &str) {
    let mut fields = Vec::new();
    while fields.len() < MAX_TRAILING_FIELDS {
        let Some(caps) = BRACKET_GROUP_RE.captures(rest) else {
            break;
        };
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            break;
        };
        fields.push(inner.as_str());
        rest = &rest[whole.end()..];
    }
    (fields, rest.trim())
}

pub(super) fn parse(line: &str) -> Option<ParsedLine> {
    let caps = HEAD_RE.captures(line)?;
    let level = LogLevel::from_token(&caps["level"])?;

    let (trailing, tail) = split_trailing(caps.name("rest").map_or("", |m| m.as_str()));
    if trailing.len() < MIN_TRAILING_FIELDS {
        return None;
    }

    let process = caps.name("pid").or_else(|| caps.name("pid_only"));
    let thread = caps.name("tid").or_else(|| caps.name("tid_only"));

    let mut parsed = ParsedLine::new(LineFormat::StructuredBracket, tail)
        .with_level(Some(level))
        .with_module(Some(&caps["module"]))
        .with_process(process.map(|m| m.as_str()))
        .with_thread(thread.map(|m| m.as_str()))
        .with_source(Some(&caps["func"]), Some(&caps["line"]));

    let mut override_message: Option<&str> = None;
    for field in trailing {
        match classify(field) {
            TrailingField::Account { account, user } => {
                parsed = parsed
                    .with_metadata("account", account)
                    .with_metadata("user", user);
            }
            TrailingField::Project(project) => parsed = parsed.with_metadata("project", project),
            TrailingField::UserId(uid) => parsed = parsed.with_metadata("user_id", uid),
            TrailingField::Placeholder => {}
            TrailingField::Message(text) => {
                // the first literal field wins
                override_message.get_or_insert(text);
            }
        }
    }

    if let Some(text) = override_message {
        parsed.message = text.to_string();
    }

    Some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_ids_and_metadata() {
        let parsed = parse(
            "2025-03-01 08:00:00.250 [INFO] [Media] [0x1a2b:0x3c] [open_stream:77] \
             [acc:team01/user:alice] [proj:atlas] [uid:9001] [-] stream opened",
        )
        .unwrap();
        assert_eq!(parsed.level, Some(LogLevel::Info));
        assert_eq!(parsed.module.as_deref(), Some("Media"));
        assert_eq!(parsed.process.as_deref(), Some("0x1a2b"));
        assert_eq!(parsed.thread.as_deref(), Some("0x3c"));
        assert_eq!(parsed.source_file.as_deref(), Some("open_stream"));
        assert_eq!(parsed.source_line, Some(77));
        assert_eq!(parsed.get_metadata("account"), Some("team01"));
        assert_eq!(parsed.get_metadata("user"), Some("alice"));
        assert_eq!(parsed.get_metadata("project"), Some("atlas"));
        assert_eq!(parsed.get_metadata("user_id"), Some("9001"));
        assert_eq!(parsed.message, "stream opened");
    }

    #[test]
    fn test_separate_ids() {
        let parsed = parse(
            "2025-03-01 08:00:00.250 [ERROR] [Media] [412] [413] [decode:9] [-] [-] bad frame",
        )
        .unwrap();
        assert_eq!(parsed.process.as_deref(), Some("412"));
        assert_eq!(parsed.thread.as_deref(), Some("413"));
        assert_eq!(parsed.level, Some(LogLevel::Error));
        assert_eq!(parsed.message, "bad frame");
    }

    #[test]
    fn test_literal_field_overrides_tail() {
        let parsed = parse(
            "2025-03-01 08:00:00.250 [WARN] [Media] [1:2] [decode:9] [-] [frame dropped] ignored",
        )
        .unwrap();
        assert_eq!(parsed.message, "frame dropped");
        assert!(parsed.metadata.is_empty());
    }

    #[test]
    fn test_requires_two_trailing_fields() {
        assert!(parse("2025-03-01 08:00:00.250 [WARN] [Media] [1:2] [decode:9] [-] tail").is_none());
    }

    #[test]
    fn test_fifth_bracket_stays_in_message() {
        let parsed = parse(
            "2025-03-01 08:00:00.250 [DEBUG] [Media] [1:2] [f:1] [-] [-] [-] [-] [extra] tail",
        )
        .unwrap();
        assert_eq!(parsed.message, "[extra] tail");
    }

    #[test]
    fn test_unknown_level_word_is_rejected() {
        assert!(parse("2025-03-01 08:00:00.250 [Media] [Net] [1:2] [f:1] [-] [-] x").is_none());
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(" N/A "), TrailingField::Placeholder);
        assert_eq!(classify("project=atlas"), TrailingField::Project("atlas"));
        assert_eq!(classify("user_id:42"), TrailingField::UserId("42"));
        assert_eq!(classify("hello"), TrailingField::Message("hello"));
    }
}
