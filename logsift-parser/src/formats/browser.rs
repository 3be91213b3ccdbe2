use super::{LineFormat, line_regex};
use crate::{fields::ParsedLine, level::LogLevel};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // `[pid:tid:MMDD/HHMMSS.mmm:LEVEL:file.cc(line)] msg`, optionally followed by `[TS]`
    static ref COMBINED_RE: Regex = line_regex(
        r"(?x)
          ^\[(?P<pid>\d+):(?P<tid>\d+):
          (?P<stamp>\d{4}/\d{6}(?:\.\d+)?):
          (?P<level>[A-Za-z0-9_]+):
          (?P<file>[^\]\(]+)(?:\((?P<line>\d+)\))?\]\s*
          (?P<msg>.*?)
          (?:\s*\[(?P<ts>{TS})\])?\s*$"
    );
}

pub(super) fn parse(line: &str) -> Option<ParsedLine> {
    let caps = COMBINED_RE.captures(line)?;

    let mut parsed = ParsedLine::new(LineFormat::BrowserCombined, &caps["msg"])
        .with_level(LogLevel::from_token(&caps["level"]))
        .with_process(Some(&caps["pid"]))
        .with_thread(Some(&caps["tid"]))
        .with_source(Some(&caps["file"]), caps.name("line").map(|m| m.as_str()))
        .with_metadata("browser_time", &caps["stamp"]);

    if let Some(ts) = caps.name("ts") {
        parsed = parsed.with_metadata("trailing_timestamp", ts.as_str());
    }

    Some(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_trailing_timestamp() {
        let parsed = parse("[1234:5678:0115/103000.123:ERROR:net_errors.cc(42)] connect refused")
            .unwrap();
        assert_eq!(parsed.process.as_deref(), Some("1234"));
        assert_eq!(parsed.thread.as_deref(), Some("5678"));
        assert_eq!(parsed.level, Some(LogLevel::Error));
        assert_eq!(parsed.source_file.as_deref(), Some("net_errors.cc"));
        assert_eq!(parsed.source_line, Some(42));
        assert_eq!(parsed.message, "connect refused");
        assert_eq!(parsed.get_metadata("browser_time"), Some("0115/103000.123"));
        assert_eq!(parsed.get_metadata("trailing_timestamp"), None);
    }

    #[test]
    fn test_with_trailing_timestamp() {
        let parsed = parse(
            "[1:2:0115/103000.123:VERBOSE1:socket.cc(7)] read 10 bytes [2025-01-15 10:30:00.123]",
        )
        .unwrap();
        assert_eq!(parsed.level, Some(LogLevel::Trace));
        assert_eq!(parsed.message, "read 10 bytes");
        assert_eq!(
            parsed.get_metadata("trailing_timestamp"),
            Some("2025-01-15 10:30:00.123")
        );
    }

    #[test]
    fn test_unknown_level_kept_absent() {
        let parsed = parse("[1:2:0115/103000:DUMP:a.cc] x").unwrap();
        assert_eq!(parsed.level, None);
        assert_eq!(parsed.source_line, None);
        assert_eq!(parsed.source_file.as_deref(), Some("a.cc"));
    }
}
