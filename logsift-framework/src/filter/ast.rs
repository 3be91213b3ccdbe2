use itertools::Itertools;
use regex::{Regex, RegexBuilder};
use std::fmt;

const TERM_REGEX_SIZE_LIMIT: usize = 1 << 16;

#[derive(Debug, Clone)]
enum TermMatcher {
    Pattern(Regex),
    /// lowercase needle, used when the escaped pattern cannot be compiled
    Substring(String),
}

/// one include or exclude term; matching is case-insensitive containment
#[derive(Debug, Clone)]
pub struct MatchTerm {
    text: String,
    matcher: TermMatcher,
}

impl MatchTerm {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let matcher = match RegexBuilder::new(&regex::escape(&text))
            .case_insensitive(true)
            .size_limit(TERM_REGEX_SIZE_LIMIT)
            .build()
        {
            Ok(re) => TermMatcher::Pattern(re),
            Err(e) => {
                log::debug!("term {text:?} falls back to substring matching: {e}");
                TermMatcher::Substring(text.to_lowercase())
            }
        };
        Self { text, matcher }
    }

    /// the term as written
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        match &self.matcher {
            TermMatcher::Pattern(re) => re.is_match(haystack),
            TermMatcher::Substring(needle) => haystack.to_lowercase().contains(needle.as_str()),
        }
    }

    pub fn is_substring_fallback(&self) -> bool {
        matches!(self.matcher, TermMatcher::Substring(_))
    }
}

impl PartialEq for MatchTerm {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for MatchTerm {}

/// a date bound as written plus its resolved epoch millis
///
/// for end bounds `millis` is already the inclusive upper limit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateBound {
    pub text: String,
    pub millis: i64,
}

/// one side of a date range
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeBound {
    /// compares against `line_number`
    Row(usize),
    /// compares against `timestamp_ms`
    Date(DateBound),
}

impl fmt::Display for RangeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeBound::Row(n) => write!(f, "#{n}"),
            RangeBound::Date(bound) => write!(f, "#{}", bound.text),
        }
    }
}

/// inclusive bounds over `line_number`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowRange {
    pub start: Option<usize>,
    pub end: Option<usize>,
}

impl RowRange {
    pub fn contains(&self, line_number: usize) -> bool {
        self.start.is_none_or(|s| line_number >= s) && self.end.is_none_or(|e| line_number <= e)
    }
}

/// inclusive bounds over `timestamp_ms`, either side possibly row-typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<RangeBound>,
    pub end: Option<RangeBound>,
}

impl DateRange {
    /// entries without a timestamp fail any date-typed side
    pub fn contains(&self, line_number: usize, timestamp_ms: Option<i64>) -> bool {
        let start_ok = match &self.start {
            None => true,
            Some(RangeBound::Row(n)) => line_number >= *n,
            Some(RangeBound::Date(bound)) => timestamp_ms.is_some_and(|ms| ms >= bound.millis),
        };
        let end_ok = match &self.end {
            None => true,
            Some(RangeBound::Row(n)) => line_number <= *n,
            Some(RangeBound::Date(bound)) => timestamp_ms.is_some_and(|ms| ms <= bound.millis),
        };
        start_ok && end_ok
    }
}

/// parsed filter expression
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterAst {
    pub include_terms: Vec<MatchTerm>,
    pub exclude_terms: Vec<MatchTerm>,
    pub row_range: Option<RowRange>,
    pub date_range: Option<DateRange>,
    /// display-only; never filters
    pub gap_threshold_seconds: Option<f64>,
}

impl FilterAst {
    /// true when the expression constrains nothing
    pub fn is_empty(&self) -> bool {
        self.include_terms.is_empty()
            && self.exclude_terms.is_empty()
            && self.row_range.is_none()
            && self.date_range.is_none()
            && self.gap_threshold_seconds.is_none()
    }

    /// canonical form: includes, excludes, row range, date range, gap
    pub fn to_filter_string(&self) -> String {
        let includes = self.include_terms.iter().map(|t| t.text().to_string());
        let excludes = self.exclude_terms.iter().map(|t| format!("!{}", t.text()));
        let rows = self
            .row_range
            .filter(|r| r.start.is_some() || r.end.is_some())
            .map(|r| {
                format!(
                    "{}::{}",
                    r.start.map(|s| format!("#{s}")).unwrap_or_default(),
                    r.end.map(|e| format!("#{e}")).unwrap_or_default()
                )
            });
        let dates = self
            .date_range
            .as_ref()
            .filter(|r| r.start.is_some() || r.end.is_some())
            .map(|r| {
                format!(
                    "{}::{}",
                    r.start.as_ref().map(ToString::to_string).unwrap_or_default(),
                    r.end.as_ref().map(ToString::to_string).unwrap_or_default()
                )
            });
        let gap = self.gap_threshold_seconds.map(|g| format!("#gap={g}"));

        includes
            .chain(excludes)
            .chain(rows)
            .chain(dates)
            .chain(gap)
            .join("||")
    }
}

impl fmt::Display for FilterAst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_filter_string())
    }
}
