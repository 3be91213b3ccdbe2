//! Per-platform line matchers.
//!
//! Every matcher has the same contract, `attempt(line) -> Option<ParsedLine>`.
//! [`detect_fields`] tries them in [`CASCADE`] order and returns the first
//! success; lines nothing recognises fall through to [`generic::parse`].

mod android;
mod bracket;
mod browser;
mod generic;
mod structured;

pub use bracket::assign_thread_process;

use crate::{fields::ParsedLine, timestamp::ANY_TIMESTAMP};
use regex::Regex;
use std::fmt;

/// the line layouts the detector can recognise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineFormat {
    /// `TS [module:line] [L] [T:tid] [P:pid] msg`
    TaggedBracket,
    /// `TS [module] [n] [n] msg`, thread/process told apart by magnitude
    PositionalBracket,
    /// `TS [LEVEL] [module] [pid:tid] [func:line] [meta]... msg`
    StructuredBracket,
    /// `TS [] [] [pid:tid] msg`
    MinimalBracket,
    /// `TS [L] [module] [func:line] [-] [-] [thread] msg`
    LinuxBracket,
    /// `TS [pid:tid] [module] - [LEVEL] - msg`
    AndroidBracket,
    /// logcat threadtime columns: `date time pid tid L tag: msg`
    AndroidSystem,
    /// `[pid:tid:MMDD/HHMMSS.mmm:LEVEL:file(line)] msg [TS]`
    BrowserCombined,
    /// no structural match
    Generic,
}

/// full-line matchers in priority order; the generic fallback is not listed
pub const CASCADE: [LineFormat; 8] = [
    LineFormat::TaggedBracket,
    LineFormat::PositionalBracket,
    LineFormat::StructuredBracket,
    LineFormat::MinimalBracket,
    LineFormat::LinuxBracket,
    LineFormat::AndroidBracket,
    LineFormat::AndroidSystem,
    LineFormat::BrowserCombined,
];

impl LineFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaggedBracket => "tagged",
            Self::PositionalBracket => "positional",
            Self::StructuredBracket => "structured",
            Self::MinimalBracket => "minimal",
            Self::LinuxBracket => "linux",
            Self::AndroidBracket => "android",
            Self::AndroidSystem => "android-system",
            Self::BrowserCombined => "browser",
            Self::Generic => "generic",
        }
    }

    /// try this layout against `line`
    ///
    /// `Generic` always succeeds
    pub fn attempt(self, line: &str) -> Option<ParsedLine> {
        match self {
            Self::TaggedBracket => bracket::parse_tagged(line),
            Self::PositionalBracket => bracket::parse_positional(line),
            Self::StructuredBracket => structured::parse(line),
            Self::MinimalBracket => bracket::parse_minimal(line),
            Self::LinuxBracket => bracket::parse_linux(line),
            Self::AndroidBracket => android::parse_bracket(line),
            Self::AndroidSystem => android::parse_system(line),
            Self::BrowserCombined => browser::parse(line),
            Self::Generic => Some(generic::parse(line)),
        }
    }
}

impl fmt::Display for LineFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// extract structured fields from one line; never fails
pub fn detect_fields(line: &str) -> ParsedLine {
    // be robust to a BOM or stray control chars in front of the first field
    let line = line.trim_start_matches(|c: char| c == '\u{feff}' || c.is_control());

    CASCADE
        .iter()
        .find_map(|format| format.attempt(line))
        .unwrap_or_else(|| generic::parse(line))
}

/// compile a full-line pattern, substituting `{TS}` with the timestamp alternation
pub(crate) fn line_regex(pattern: &str) -> Regex {
    Regex::new(&pattern.replace("{TS}", ANY_TIMESTAMP)).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LogLevel;

    #[test]
    fn test_cascade_order_picks_first_match() {
        let parsed = detect_fields("2025-08-02 23:54:57:514 [Routing] [1234] [5678] connected");
        assert_eq!(parsed.format, LineFormat::PositionalBracket);
        assert_eq!(parsed.module.as_deref(), Some("Routing"));
        assert_eq!(parsed.message, "connected");
    }

    #[test]
    fn test_every_format_reachable() {
        let samples = [
            (
                "2025-01-01 10:00:00.000 [Net:42] [W] [T:7] [P:99] slow",
                LineFormat::TaggedBracket,
            ),
            (
                "2025-01-01 10:00:00.000 [Net] [7] [99] hi",
                LineFormat::PositionalBracket,
            ),
            (
                "2025-01-01 10:00:00.000 [INFO] [Net] [99:7] [connect:42] [-] [-] hi",
                LineFormat::StructuredBracket,
            ),
            (
                "2025-01-01 10:00:00.000 [] [] [99:7] hi",
                LineFormat::MinimalBracket,
            ),
            (
                "2025-01-01 10:00:00.000 [I] [Net] [connect:42] [-] [-] [main] hi",
                LineFormat::LinuxBracket,
            ),
            (
                "2025-01-01 10:00:00.000 [99:7] [Net] - [INFO] - hi",
                LineFormat::AndroidBracket,
            ),
            (
                "01-15 10:30:00.123  1234  5678 I ActivityManager: hi",
                LineFormat::AndroidSystem,
            ),
            (
                "[1234:5678:0115/103000.123:ERROR:net.cc(42)] hi",
                LineFormat::BrowserCombined,
            ),
            ("plain text", LineFormat::Generic),
        ];
        for (line, expected) in samples {
            assert_eq!(detect_fields(line).format, expected, "line: {line}");
        }
    }

    #[test]
    fn test_generic_fallback_keeps_line() {
        let parsed = detect_fields("something ERROR: went wrong");
        assert_eq!(parsed.format, LineFormat::Generic);
        assert_eq!(parsed.level, Some(LogLevel::Error));
        assert_eq!(parsed.message, "something ERROR: went wrong");
        assert_eq!(parsed.thread, None);
    }

    #[test]
    fn test_bom_is_ignored() {
        let parsed = detect_fields("\u{feff}2025-01-01 10:00:00.000 [Net] [7] [99] hi");
        assert_eq!(parsed.format, LineFormat::PositionalBracket);
    }
}
