use crate::{fields::ParsedLine, level::LogLevel};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // `[ERROR]`, `<warn>` style or `ERROR:` style level words
    static ref LEVEL_KEYWORD_RE: Regex = Regex::new(
        r"(?i)(?:[\[<](error|err|fatal|critical|severe|warn|warning|info|notice|debug|trace|verbose)[\]>]|\b(error|err|fatal|critical|severe|warn|warning|info|notice|debug|trace|verbose)\s*:)"
    )
    .unwrap();

    static ref FIRST_BRACKET_RE: Regex = Regex::new(r"\[([^\]]*)\]").unwrap();
}

/// scan for the first level keyword in the line
pub fn scan_level(line: &str) -> Option<LogLevel> {
    let caps = LEVEL_KEYWORD_RE.captures(line)?;
    let word = caps.get(1).or_else(|| caps.get(2))?;
    LogLevel::from_token(word.as_str())
}

/// the first bracket's content, if it plausibly names a module
fn scan_module(line: &str) -> Option<&str> {
    let content = FIRST_BRACKET_RE.captures(line)?.get(1)?.as_str().trim();

    let plausible = !content.is_empty()
        && !content.contains(':')
        && !content.chars().all(|c| c.is_ascii_digit())
        && LogLevel::from_token(content).is_none();

    plausible.then_some(content)
}

/// fallback when no layout matched: keep the whole line, guess level and module
pub(super) fn parse(line: &str) -> ParsedLine {
    ParsedLine::degraded(line)
        .with_level(scan_level(line))
        .with_module(scan_module(line))
}
