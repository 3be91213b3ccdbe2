use super::{LineFormat, line_regex};
use crate::{fields::ParsedLine, level::LogLevel};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // bracketed fields closed by a `- [LEVEL] -` marker
    static ref BRACKET_RE: Regex = line_regex(
        r"(?x)
          ^(?P<ts>{TS})\s*
          \[(?P<pid>\d+):(?P<tid>\d+)\]\s*
          \[(?P<module>[^\]]*)\]\s*
          -\s*\[(?P<level>[A-Za-z]+)\]\s*-\s*
          (?P<msg>.*)$"
    );

    // logcat threadtime: `MM-DD HH:MM:SS.mmm  PID  TID L TAG: msg`, year optional
    static ref SYSTEM_RE: Regex = Regex::new(
        r"(?x)
          ^(?:\d{4}-)?\d{2}-\d{2}\s+
          \d{2}:\d{2}:\d{2}\.\d{3,6}\s+
          (?P<pid>\d+)\s+
          (?P<tid>\d+)\s+
          (?P<level>[VDIWEFA])\s+
          (?P<module>[^:]*?)\s*:
          \s?(?P<msg>.*)$"
    )
    .unwrap();
}

pub(super) fn parse_bracket(line: &str) -> Option<ParsedLine> {
    let caps = BRACKET_RE.captures(line)?;
    let level = LogLevel::from_token(&caps["level"])?;

    Some(
        ParsedLine::new(LineFormat::AndroidBracket, caps["msg"].trim())
            .with_level(Some(level))
            .with_module(Some(&caps["module"]))
            .with_process(Some(&caps["pid"]))
            .with_thread(Some(&caps["tid"])),
    )
}

pub(super) fn parse_system(line: &str) -> Option<ParsedLine> {
    let caps = SYSTEM_RE.captures(line)?;
    let level = caps["level"].chars().next().and_then(LogLevel::from_letter);

    Some(
        ParsedLine::new(LineFormat::AndroidSystem, caps["msg"].trim_end())
            .with_level(level)
            .with_module(Some(&caps["module"]))
            .with_process(Some(&caps["pid"]))
            .with_thread(Some(&caps["tid"])),
    )
}
