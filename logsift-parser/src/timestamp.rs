use lazy_static::lazy_static;
use regex::Regex;

/// layout of an extracted timestamp, in extraction priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimestampKind {
    /// `YYYY-MM-DD HH:MM:SS:mmm`
    DateColonMillis,
    /// `YYYY-MM-DD HH:MM:SS.mmm`, 3 to 6 fraction digits
    DateFraction,
    /// `YYYY-MM-DD HH:MM:SS`
    DateSeconds,
    /// `DD/MM/YY HH:MM:SS.mmm`
    SlashShortYear,
    /// `DD/MM/YYYY HH:MM:SS.mmm`
    SlashLongYear,
    /// `HH:MM:SS:mmm`
    TimeColonMillis,
    /// `HH:MM:SS.mmm`
    TimeDotMillis,
    /// `YYYY-MM-DDTHH:MM:SS.mmm`
    IsoMillis,
    /// `YYYY-MM-DDTHH:MM:SS`
    IsoSeconds,
}

impl TimestampKind {
    /// true when the layout carries no calendar date
    pub fn is_time_only(&self) -> bool {
        matches!(self, Self::TimeColonMillis | Self::TimeDotMillis)
    }
}

/// a timestamp found inside a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractedTimestamp<'a> {
    pub text: &'a str,
    pub kind: TimestampKind,
    /// byte offset of `text` within the line
    pub start: usize,
}

lazy_static! {
    static ref TIMESTAMP_TABLE: Vec<(TimestampKind, Regex)> = [
        (TimestampKind::DateColonMillis, r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}:\d{3}"),
        (TimestampKind::DateFraction, r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3,6}"),
        (TimestampKind::DateSeconds, r"\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}"),
        (TimestampKind::SlashShortYear, r"\d{2}/\d{2}/\d{2} \d{2}:\d{2}:\d{2}\.\d{3}"),
        (TimestampKind::SlashLongYear, r"\d{2}/\d{2}/\d{4} \d{2}:\d{2}:\d{2}\.\d{3}"),
        (TimestampKind::TimeColonMillis, r"\d{2}:\d{2}:\d{2}:\d{3}"),
        (TimestampKind::TimeDotMillis, r"\d{2}:\d{2}:\d{2}\.\d{3}"),
        (TimestampKind::IsoMillis, r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}"),
        (TimestampKind::IsoSeconds, r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}"),
    ]
    .into_iter()
    .map(|(kind, pattern)| (kind, Regex::new(pattern).unwrap()))
    .collect();
}

/// any timestamp layout the extractor knows, for embedding in full-line matchers
///
/// spaces are written as `\x20` so the alternation survives `(?x)` patterns
pub(crate) const ANY_TIMESTAMP: &str = r"(?:\d{4}-\d{2}-\d{2}[\x20T]\d{2}:\d{2}:\d{2}(?:[:.]\d{3,6})?|\d{2}/\d{2}/(?:\d{4}|\d{2})\x20\d{2}:\d{2}:\d{2}\.\d{3}|\d{2}:\d{2}:\d{2}[:.]\d{3})";

/// find the first timestamp in `line`, trying layouts in fixed priority order
///
/// the first layout that matches anywhere in the line wins, even if a later
/// layout would match earlier in the line
pub fn extract_timestamp(line: &str) -> Option<ExtractedTimestamp<'_>> {
    TIMESTAMP_TABLE.iter().find_map(|(kind, re)| {
        re.find(line).map(|m| ExtractedTimestamp {
            text: m.as_str(),
            kind: *kind,
            start: m.start(),
        })
    })
}

/// convenience wrapper returning only the matched substring
pub fn find_timestamp(line: &str) -> Option<&str> {
    extract_timestamp(line).map(|ts| ts.text)
}
