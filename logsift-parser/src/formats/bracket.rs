use super::{LineFormat, line_regex};
use crate::{fields::ParsedLine, level::LogLevel};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAGGED_RE: Regex = line_regex(
        r"(?x)
          ^(?P<ts>{TS})\s*
          \[(?P<module>[^\]:]+):(?P<line>\d+)\]\s*
          \[(?P<level>[A-Za-z])\]\s*
          \[T(?:hread)?[:=](?P<thread>[^\]]+)\]\s*
          \[P(?:rocess|id)?[:=](?P<process>[^\]]+)\]\s*
          (?P<msg>.*)$"
    );

    static ref POSITIONAL_RE: Regex = line_regex(
        r"(?x)
          ^(?P<ts>{TS})\s*
          \[(?P<module>[^\]\d:][^\]:]*)(?::(?P<line>\d+))?\]\s*
          \[(?P<first>\d+)\]\s*
          \[(?P<second>\d+)\]\s*
          (?P<msg>.*)$"
    );

    static ref MINIMAL_RE: Regex = line_regex(
        r"(?x)
          ^(?P<ts>{TS})\s*
          \[\s*\]\s*\[\s*\]\s*
          \[(?P<process>(?:0x)?[0-9A-Fa-f]+):(?P<thread>(?:0x)?[0-9A-Fa-f]+)\]\s*
          (?P<msg>.*)$"
    );

    static ref LINUX_RE: Regex = line_regex(
        r"(?x)
          ^(?P<ts>{TS})\s*
          \[(?P<level>[A-Za-z])\]\s*
          \[(?P<module>[^\]]*)\]\s*
          \[(?P<func>[^\]:]+):(?P<line>\d+)\]\s*
          \[[^\]]*\]\s*\[[^\]]*\]\s*
          \[(?P<thread>[^\]]*)\]\s*
          (?P<msg>.*)$"
    );
}

pub(super) fn parse_tagged(line: &str) -> Option<ParsedLine> {
    let caps = TAGGED_RE.captures(line)?;
    let level = caps["level"].chars().next().and_then(LogLevel::from_letter)?;

    Some(
        ParsedLine::new(LineFormat::TaggedBracket, caps["msg"].trim())
            .with_level(Some(level))
            .with_module(Some(&caps["module"]))
            .with_source(None, Some(&caps["line"]))
            .with_thread(Some(&caps["thread"]))
            .with_process(Some(&caps["process"])),
    )
}

/// split two bare ids into (thread, process)
///
/// approximate: the log carries no marker saying which is which. the smaller
/// value is taken as the thread unless the larger exceeds it more than tenfold,
/// in which case the roles flip.
pub fn assign_thread_process(first: u64, second: u64) -> (u64, u64) {
    let (small, large) = if first <= second {
        (first, second)
    } else {
        (second, first)
    };

    if large > small.saturating_mul(10) {
        (large, small)
    } else {
        (small, large)
    }
}

pub(super) fn parse_positional(line: &str) -> Option<ParsedLine> {
    let caps = POSITIONAL_RE.captures(line)?;
    let first: u64 = caps["first"].parse().ok()?;
    let second: u64 = caps["second"].parse().ok()?;
    let (thread, process) = assign_thread_process(first, second);

    Some(
        ParsedLine::new(LineFormat::PositionalBracket, caps["msg"].trim())
            .with_module(Some(&caps["module"]))
            .with_source(None, caps.name("line").map(|m| m.as_str()))
            .with_thread(Some(&thread.to_string()))
            .with_process(Some(&process.to_string())),
    )
}

pub(super) fn parse_minimal(line: &str) -> Option<ParsedLine> {
    let caps = MINIMAL_RE.captures(line)?;

    Some(
        ParsedLine::new(LineFormat::MinimalBracket, caps["msg"].trim())
            .with_process(Some(&caps["process"]))
            .with_thread(Some(&caps["thread"])),
    )
}

pub(super) fn parse_linux(line: &str) -> Option<ParsedLine> {
    let caps = LINUX_RE.captures(line)?;
    let level = caps["level"].chars().next().and_then(LogLevel::from_letter)?;

    Some(
        ParsedLine::new(LineFormat::LinuxBracket, caps["msg"].trim())
            .with_level(Some(level))
            .with_module(Some(&caps["module"]))
            .with_source(Some(&caps["func"]), Some(&caps["line"]))
            .with_thread(Some(&caps["thread"])),
    )
}
