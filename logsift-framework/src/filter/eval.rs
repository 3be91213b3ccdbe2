use super::ast::FilterAst;
use crate::entry::Entry;
use logsift_parser::LogLevel;
use rayon::prelude::*;
use std::collections::BTreeSet;

/// above this many entries the match pass runs on the rayon pool
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1000;

/// which severities are shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSet {
    levels: BTreeSet<LogLevel>,
    /// whether entries with no detected level pass
    include_unleveled: bool,
}

impl LevelSet {
    /// every level, plus unleveled entries
    pub fn all() -> Self {
        Self {
            levels: LogLevel::ALL.into_iter().collect(),
            include_unleveled: true,
        }
    }

    /// exactly these levels; unleveled entries are hidden
    pub fn only(levels: impl IntoIterator<Item = LogLevel>) -> Self {
        Self {
            levels: levels.into_iter().collect(),
            include_unleveled: false,
        }
    }

    pub fn with_unleveled(mut self, include: bool) -> Self {
        self.include_unleveled = include;
        self
    }

    pub fn allows(&self, level: Option<LogLevel>) -> bool {
        match level {
            Some(level) => self.levels.contains(&level),
            None => self.include_unleveled,
        }
    }

    pub fn is_all(&self) -> bool {
        self.include_unleveled && self.levels.len() == LogLevel::ALL.len()
    }
}

impl Default for LevelSet {
    fn default() -> Self {
        Self::all()
    }
}

/// evaluation inputs that live outside the filter string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalOptions {
    pub levels: LevelSet,
    /// inclusive absolute bounds on `timestamp_ms`
    pub time_start: Option<i64>,
    pub time_end: Option<i64>,
    /// context width N
    pub context: usize,
    pub parallel_threshold: usize,
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self {
            levels: LevelSet::all(),
            time_start: None,
            time_end: None,
            context: 0,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl EvalOptions {
    pub fn with_context(mut self, context: usize) -> Self {
        self.context = context;
        self
    }

    pub fn with_levels(mut self, levels: LevelSet) -> Self {
        self.levels = levels;
        self
    }

    pub fn with_time_bounds(mut self, start: Option<i64>, end: Option<i64>) -> Self {
        self.time_start = start;
        self.time_end = end;
        self
    }
}

/// one displayed row of a filtered view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRow {
    /// index into the entry slice
    pub index: usize,
    /// shown only because it neighbours a match
    pub is_context_line: bool,
    /// elapsed time since the previous timestamped row exceeds the gap threshold
    pub gap_exceeded: bool,
}

/// ordered result of [`evaluate`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilteredView {
    pub rows: Vec<ViewRow>,
    /// rows that matched on their own (context rows excluded)
    pub match_count: usize,
}

impl FilteredView {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn indices(&self) -> Vec<usize> {
        self.rows.iter().map(|r| r.index).collect()
    }

    pub fn entries<'a>(&'a self, entries: &'a [Entry]) -> impl Iterator<Item = &'a Entry> + 'a {
        self.rows.iter().filter_map(move |r| entries.get(r.index))
    }

    /// message of every row, in view order
    pub fn messages<'a>(&self, entries: &'a [Entry]) -> Vec<&'a str> {
        self.rows
            .iter()
            .filter_map(|r| entries.get(r.index))
            .map(|e| e.message.as_str())
            .collect()
    }
}

/// whether `entry` survives the first pass
pub fn matches_entry(entry: &Entry, ast: &FilterAst, options: &EvalOptions) -> bool {
    if let Some(rows) = &ast.row_range
        && !rows.contains(entry.line_number)
    {
        return false;
    }

    if let Some(dates) = &ast.date_range
        && !dates.contains(entry.line_number, entry.timestamp_ms)
    {
        return false;
    }

    if ast.exclude_terms.iter().any(|t| t.is_match(&entry.message)) {
        return false;
    }

    if !ast.include_terms.is_empty() && !ast.include_terms.iter().any(|t| t.is_match(&entry.message)) {
        return false;
    }

    if !options.levels.is_all() && !options.levels.allows(entry.level) {
        return false;
    }

    if options.time_start.is_some() || options.time_end.is_some() {
        let Some(ms) = entry.timestamp_ms else {
            return false;
        };
        if options.time_start.is_some_and(|start| ms < start) {
            return false;
        }
        if options.time_end.is_some_and(|end| ms > end) {
            return false;
        }
    }

    true
}

/// filter `entries` and expand context; output is in original order
pub fn evaluate(entries: &[Entry], ast: &FilterAst, options: &EvalOptions) -> FilteredView {
    let matched: Vec<bool> = if entries.len() > options.parallel_threshold {
        entries
            .par_iter()
            .map(|e| matches_entry(e, ast, options))
            .collect()
    } else {
        entries
            .iter()
            .map(|e| matches_entry(e, ast, options))
            .collect()
    };
    let match_count = matched.iter().filter(|&&m| m).count();

    let included = expand_context(&matched, options.context);

    let mut rows: Vec<ViewRow> = included
        .iter()
        .enumerate()
        .filter(|&(_, &inc)| inc)
        .map(|(index, _)| ViewRow {
            index,
            is_context_line: !matched[index],
            gap_exceeded: false,
        })
        .collect();

    if let Some(threshold) = ast.gap_threshold_seconds {
        mark_gaps(&mut rows, entries, threshold);
    }

    log::debug!(
        "filter matched {match_count} of {} entries, {} rows with context",
        entries.len(),
        rows.len()
    );

    FilteredView { rows, match_count }
}

fn expand_context(matched: &[bool], context: usize) -> Vec<bool> {
    if context == 0 {
        return matched.to_vec();
    }

    let last = matched.len().saturating_sub(1);
    let mut included = vec![false; matched.len()];
    // first index not yet marked; windows only move forward
    let mut covered = 0;
    for (idx, _) in matched.iter().enumerate().filter(|&(_, &m)| m) {
        let lo = idx.saturating_sub(context).max(covered);
        let hi = idx.saturating_add(context).min(last);
        if lo <= hi {
            included[lo..=hi].iter_mut().for_each(|slot| *slot = true);
            covered = hi + 1;
        }
    }
    included
}

fn mark_gaps(rows: &mut [ViewRow], entries: &[Entry], threshold_seconds: f64) {
    let threshold_ms = threshold_seconds * 1000.0;
    let mut previous: Option<i64> = None;

    for row in rows.iter_mut() {
        let Some(ms) = entries.get(row.index).and_then(|e| e.timestamp_ms) else {
            continue;
        };
        if let Some(prev) = previous {
            row.gap_exceeded = (ms - prev) as f64 > threshold_ms;
        }
        previous = Some(ms);
    }
}
