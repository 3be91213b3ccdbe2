//! Secondary search over a filtered view.
//!
//! The query is a `||`-separated list of case-insensitive substrings; a row
//! is a hit when its message contains any of them. The cursor walks the hits
//! and stops at either end.

/// where the cursor stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    NoMatch,
    /// k-th hit (0-based) in view order
    AtPosition(usize),
}

/// lowercase OR-terms of a search query; blank segments are dropped
pub fn parse_search_terms(query: &str) -> Vec<String> {
    query
        .split("||")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// view positions whose message contains any term
pub fn find_matches<S: AsRef<str>>(terms: &[String], messages: &[S]) -> Vec<usize> {
    if terms.is_empty() {
        return Vec::new();
    }

    messages
        .iter()
        .enumerate()
        .filter(|(_, message)| {
            let lower = message.as_ref().to_lowercase();
            terms.iter().any(|t| lower.contains(t.as_str()))
        })
        .map(|(pos, _)| pos)
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct SearchCursor {
    query: String,
    terms: Vec<String>,
    matches: Vec<usize>,
    selected: Option<usize>,
}

impl SearchCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// set a new query over `messages` (the view's messages in order)
    ///
    /// a changed query jumps to the first hit; an unchanged one behaves like [`refresh`](Self::refresh)
    pub fn set_query<S: AsRef<str>>(&mut self, query: &str, messages: &[S]) {
        if query == self.query {
            self.refresh(messages);
            return;
        }

        self.query = query.to_string();
        self.terms = parse_search_terms(query);
        self.matches = find_matches(&self.terms, messages);
        self.select_first();
    }

    /// recompute hits for a new view under the same query, keeping the cursor in bounds
    pub fn refresh<S: AsRef<str>>(&mut self, messages: &[S]) {
        self.matches = find_matches(&self.terms, messages);
        self.selected = match (self.selected, self.matches.len()) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => Some(0),
        };
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// hit positions in view order
    pub fn matches(&self) -> &[usize] {
        &self.matches
    }

    pub fn state(&self) -> CursorState {
        match self.selected {
            Some(k) => CursorState::AtPosition(k),
            None => CursorState::NoMatch,
        }
    }

    /// view position of the selected hit
    pub fn current(&self) -> Option<usize> {
        self.selected.and_then(|k| self.matches.get(k).copied())
    }

    pub fn select_first(&mut self) {
        if self.matches.is_empty() {
            self.selected = None;
        } else {
            self.selected = Some(0);
        }
    }

    pub fn select_next(&mut self) {
        let len = self.matches.len();
        if len == 0 {
            self.selected = None;
            return;
        }

        let next = match self.selected {
            Some(i) if i + 1 >= len => len - 1, // stay at last hit
            Some(i) => i + 1,
            None => 0,
        };
        self.selected = Some(next);
    }

    pub fn select_previous(&mut self) {
        if self.matches.is_empty() {
            self.selected = None;
            return;
        }

        let prev = match self.selected {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.selected = Some(prev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: [&str; 5] = ["Connect ok", "timeout", "retry", "CONNECT failed", "done"];

    #[test]
    fn test_terms() {
        assert_eq!(parse_search_terms(" Foo || ||bar"), vec!["foo", "bar"]);
        assert!(parse_search_terms("  ").is_empty());
    }

    #[test]
    fn test_or_query() {
        let mut cursor = SearchCursor::new();
        cursor.set_query("connect||retry", &VIEW);
        assert_eq!(cursor.matches(), &[0, 2, 3]);
        assert_eq!(cursor.state(), CursorState::AtPosition(0));
        assert_eq!(cursor.current(), Some(0));
    }

    #[test]
    fn test_cursor_clamps_without_wrap() {
        let mut cursor = SearchCursor::new();
        cursor.set_query("connect", &VIEW);

        cursor.select_previous();
        assert_eq!(cursor.current(), Some(0));
        cursor.select_next();
        assert_eq!(cursor.current(), Some(3));
        cursor.select_next();
        assert_eq!(cursor.current(), Some(3));
        assert_eq!(cursor.state(), CursorState::AtPosition(1));
    }

    #[test]
    fn test_no_match() {
        let mut cursor = SearchCursor::new();
        cursor.set_query("absent", &VIEW);
        assert_eq!(cursor.state(), CursorState::NoMatch);
        cursor.select_next();
        assert_eq!(cursor.current(), None);

        cursor.set_query("", &VIEW);
        assert_eq!(cursor.state(), CursorState::NoMatch);
    }

    #[test]
    fn test_query_change_resets_to_first() {
        let mut cursor = SearchCursor::new();
        cursor.set_query("connect", &VIEW);
        cursor.select_next();
        cursor.set_query("o", &VIEW);
        assert_eq!(cursor.state(), CursorState::AtPosition(0));
    }

    #[test]
    fn test_refresh_clamps() {
        let mut cursor = SearchCursor::new();
        cursor.set_query("o", &VIEW);
        assert_eq!(cursor.matches(), &[0, 1, 3, 4]);
        cursor.select_next();
        cursor.select_next();
        cursor.select_next();
        assert_eq!(cursor.state(), CursorState::AtPosition(3));

        cursor.refresh(&["foo", "bar"]);
        assert_eq!(cursor.matches(), &[0]);
        assert_eq!(cursor.state(), CursorState::AtPosition(0));

        cursor.refresh(&["bar"]);
        assert_eq!(cursor.state(), CursorState::NoMatch);
    }
}
