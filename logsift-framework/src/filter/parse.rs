use super::ast::{DateBound, DateRange, FilterAst, MatchTerm, RangeBound, RowRange};
use crate::derived::{end_of_day, end_of_second, parse_clock, parse_ymd};
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

static ROW_BOUND: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#(\d+)$").unwrap());

static DATE_BOUND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})(?:\s+(\d{2}:\d{2}:\d{2})([:.]\d{3})?)?$").unwrap()
});

static GAP: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^#gap\s*=\s*(\S+)$").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Start,
    End,
}

/// parse a `||`-separated filter expression; never fails
///
/// malformed range or gap segments become literal include terms
pub fn parse_filter(input: &str) -> FilterAst {
    let mut ast = FilterAst::default();

    for segment in input.split("||").map(str::trim).filter(|s| !s.is_empty()) {
        if let Some(rest) = segment.strip_prefix('!') {
            let rest = rest.trim();
            if !rest.is_empty() {
                ast.exclude_terms.push(MatchTerm::new(rest));
            }
            continue;
        }

        if let Some(gap) = parse_gap(segment) {
            ast.gap_threshold_seconds = Some(gap);
            continue;
        }

        if apply_range(&mut ast, segment) {
            continue;
        }

        ast.include_terms.push(MatchTerm::new(segment));
    }

    ast
}

fn parse_gap(segment: &str) -> Option<f64> {
    let caps = GAP.captures(segment)?;
    let seconds: f64 = caps[1].parse().ok()?;
    (seconds.is_finite() && seconds >= 0.0).then_some(seconds)
}

/// `#a :: #b` with either side optional; returns false if the segment is not a range
fn apply_range(ast: &mut FilterAst, segment: &str) -> bool {
    let Some((left, right)) = segment.split_once("::") else {
        return false;
    };
    let (left, right) = (left.trim(), right.trim());
    if left.is_empty() && right.is_empty() {
        return false;
    }

    let start = match parse_bound(left, Side::Start) {
        Ok(bound) => bound,
        Err(()) => return false,
    };
    let end = match parse_bound(right, Side::End) {
        Ok(bound) => bound,
        Err(()) => return false,
    };

    let has_date = [&start, &end]
        .into_iter()
        .any(|b| matches!(b, Some(RangeBound::Date(_))));

    if has_date {
        let range = ast.date_range.get_or_insert_with(DateRange::default);
        if start.is_some() {
            range.start = start;
        }
        if end.is_some() {
            range.end = end;
        }
    } else {
        let range = ast.row_range.get_or_insert_with(RowRange::default);
        if let Some(RangeBound::Row(n)) = start {
            range.start = Some(n);
        }
        if let Some(RangeBound::Row(n)) = end {
            range.end = Some(n);
        }
    }

    true
}

/// `Ok(None)` for an empty side, `Err` for anything unrecognized
fn parse_bound(text: &str, side: Side) -> Result<Option<RangeBound>, ()> {
    if text.is_empty() {
        return Ok(None);
    }
    if let Some(caps) = ROW_BOUND.captures(text) {
        return caps[1].parse().map(|n| Some(RangeBound::Row(n))).map_err(|_| ());
    }
    let date = text.strip_prefix('#').and_then(|t| parse_date_bound(t, side)).ok_or(())?;
    Ok(Some(RangeBound::Date(date)))
}

/// inclusive lower limit in epoch millis for `YYYY-MM-DD[ HH:MM:SS[:mmm|.mmm]]`
pub fn parse_time_start(text: &str) -> Option<i64> {
    parse_date_bound(text.trim(), Side::Start).map(|b| b.millis)
}

/// inclusive upper limit; a bare date covers the whole day, a time without millis the whole second
pub fn parse_time_end(text: &str) -> Option<i64> {
    parse_date_bound(text.trim(), Side::End).map(|b| b.millis)
}

fn parse_date_bound(text: &str, side: Side) -> Option<DateBound> {
    let caps = DATE_BOUND.captures(text)?;

    let date = parse_ymd(&caps[1])?;
    let (canonical, millis) = match caps.get(2) {
        None => {
            let millis = match side {
                Side::Start => date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp_millis()),
                Side::End => end_of_day(date),
            };
            (caps[1].to_string(), millis?)
        }
        Some(clock) => {
            let fraction = caps.get(3).map(|m| m.as_str()).unwrap_or("");
            let time = parse_clock(&format!("{}{fraction}", clock.as_str()))?;
            let mut millis = NaiveDateTime::new(date, time).and_utc().timestamp_millis();
            if side == Side::End && fraction.is_empty() {
                millis = end_of_second(millis);
            }
            (format!("{} {}{fraction}", &caps[1], clock.as_str()), millis)
        }
    };

    Some(DateBound {
        text: canonical,
        millis,
    })
}
