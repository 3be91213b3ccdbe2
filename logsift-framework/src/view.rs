use crate::{
    assembler::assemble_in_batches,
    entry::Entry,
    filter::{
        DEFAULT_PARALLEL_THRESHOLD, EvalOptions, EvaluationGate, FilterAst, FilteredView,
        LevelSet, evaluate, parse_filter,
    },
    loader::{HeaderFields, LineSource, split_lines},
    search::{CursorState, SearchCursor},
    session::{FilterSession, SessionStore},
};
use anyhow::Result;

/// lines handed to the assembler per batch
pub const DEFAULT_BATCH_SIZE: usize = 5000;
pub const DEFAULT_CONTEXT_LINES: usize = 0;

/// configuration for a [`LogView`]
#[derive(Debug, Clone)]
pub struct ViewDesc {
    pub batch_size: usize,
    pub parallel_threshold: usize,
    pub context_lines: usize,
    pub initial_filter: Option<String>,
    pub levels: LevelSet,
    pub time_start: Option<i64>,
    pub time_end: Option<i64>,
}

impl ViewDesc {
    pub fn new() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            context_lines: DEFAULT_CONTEXT_LINES,
            initial_filter: None,
            levels: LevelSet::all(),
            time_start: None,
            time_end: None,
        }
    }

    pub fn eval_options(&self) -> EvalOptions {
        EvalOptions {
            levels: self.levels.clone(),
            time_start: self.time_start,
            time_end: self.time_end,
            context: self.context_lines,
            parallel_threshold: self.parallel_threshold,
        }
    }
}

impl Default for ViewDesc {
    fn default() -> Self {
        Self::new()
    }
}

/// one loaded log: its entries, the active filter and the search cursor
pub struct LogView {
    entries: Vec<Entry>,
    headers: HeaderFields,
    filter_input: String,
    ast: FilterAst,
    options: EvalOptions,
    view: FilteredView,
    search: SearchCursor,
    gate: EvaluationGate,
}

impl LogView {
    /// assemble `text` and apply the initial filter from `desc`
    pub fn load(text: &str, desc: &ViewDesc) -> Self {
        let split = split_lines(text);
        let entries = assemble_in_batches(&split.lines, desc.batch_size, |done| {
            log::debug!("assembled {done}/{} lines", split.lines.len());
        });

        let mut view = Self {
            entries,
            headers: split.headers,
            filter_input: String::new(),
            ast: FilterAst::default(),
            options: desc.eval_options(),
            view: FilteredView::default(),
            search: SearchCursor::new(),
            gate: EvaluationGate::new(),
        };
        view.set_filter(desc.initial_filter.as_deref().unwrap_or(""));
        view
    }

    pub fn from_source<S: LineSource>(source: &mut S, desc: &ViewDesc) -> Result<Self> {
        let text = source.read_text()?;
        log::info!("loaded {} ({} bytes)", source.name(), text.len());
        Ok(Self::load(&text, desc))
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn headers(&self) -> &HeaderFields {
        &self.headers
    }

    /// the filter string as typed
    pub fn filter(&self) -> &str {
        &self.filter_input
    }

    pub fn ast(&self) -> &FilterAst {
        &self.ast
    }

    pub fn view(&self) -> &FilteredView {
        &self.view
    }

    pub fn search(&self) -> &SearchCursor {
        &self.search
    }

    /// shared with hosts that evaluate off-thread; every re-evaluation here
    /// issues a ticket, so results from older tickets are dropped on publish
    pub fn gate(&self) -> &EvaluationGate {
        &self.gate
    }

    /// re-parse and re-evaluate; the search keeps its query
    pub fn set_filter(&mut self, input: &str) {
        self.filter_input = input.to_string();
        self.ast = parse_filter(input);
        self.reevaluate();
    }

    pub fn set_options(&mut self, options: EvalOptions) {
        self.options = options;
        self.reevaluate();
    }

    pub fn set_search(&mut self, query: &str) {
        let messages = self.view.messages(&self.entries);
        self.search.set_query(query, &messages);
    }

    pub fn search_state(&self) -> CursorState {
        self.search.state()
    }

    /// entry under the search cursor
    pub fn current_hit(&self) -> Option<&Entry> {
        let pos = self.search.current()?;
        let row = self.view.rows.get(pos)?;
        self.entries.get(row.index)
    }

    pub fn next_hit(&mut self) -> Option<&Entry> {
        self.search.select_next();
        self.current_hit()
    }

    pub fn previous_hit(&mut self) -> Option<&Entry> {
        self.search.select_previous();
        self.current_hit()
    }

    pub fn save_session<S: SessionStore>(&self, session: &mut FilterSession<S>) {
        session.save(&self.filter_input);
    }

    /// apply a previously saved filter, if any; returns whether one was found
    pub fn restore_session<S: SessionStore>(&mut self, session: &FilterSession<S>) -> bool {
        match session.restore() {
            Some(filter) => {
                self.set_filter(&filter);
                true
            }
            None => false,
        }
    }

    fn reevaluate(&mut self) {
        let ticket = self.gate.issue();
        let result = evaluate(&self.entries, &self.ast, &self.options);
        let Some(view) = self.gate.publish(ticket, result) else {
            log::debug!("dropped superseded evaluation");
            return;
        };
        self.view = view;
        let messages = self.view.messages(&self.entries);
        self.search.refresh(&messages);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{loader::TextSource, session::MemoryStore};

    const LOG: &str = "User: alice\n\
        2025-01-01 10:00:00.000 [Net] [7] [99] connect ok\n\
        2025-01-01 10:00:01.000 [Net] [7] [99] timeout\n\
        \tat socket.rs\n\
        2025-01-01 10:00:09.000 [Net] [7] [99] connect retry\n";

    #[test]
    fn test_load_and_filter() {
        let mut view = LogView::load(LOG, &ViewDesc::new());
        assert_eq!(view.headers().get("User"), Some("alice"));
        assert_eq!(view.entries().len(), 3);
        assert_eq!(view.view().len(), 3);

        view.set_filter("connect");
        assert_eq!(view.view().indices(), vec![0, 2]);
        assert_eq!(view.filter(), "connect");
    }

    #[test]
    fn test_initial_filter_and_context() {
        let desc = ViewDesc {
            initial_filter: Some("timeout".to_string()),
            context_lines: 1,
            ..ViewDesc::new()
        };
        let view = LogView::load(LOG, &desc);
        assert_eq!(view.view().indices(), vec![0, 1, 2]);
        assert_eq!(view.view().match_count, 1);
    }

    #[test]
    fn test_search_follows_filter() {
        let mut view = LogView::load(LOG, &ViewDesc::new());
        view.set_search("connect");
        assert_eq!(view.search().matches(), &[0, 2]);
        assert_eq!(view.next_hit().map(|e| e.id), Some(2));
        assert_eq!(view.next_hit().map(|e| e.id), Some(2));

        view.set_filter("retry");
        assert_eq!(view.search_state(), CursorState::AtPosition(0));
        assert_eq!(view.current_hit().map(|e| e.id), Some(2));
    }

    #[test]
    fn test_session_round_trip() {
        let mut session = FilterSession::new(MemoryStore::new());
        let mut view = LogView::load(LOG, &ViewDesc::new());
        view.set_filter("!timeout");
        view.save_session(&mut session);

        let mut fresh = LogView::load(LOG, &ViewDesc::new());
        assert!(fresh.restore_session(&session));
        assert_eq!(fresh.filter(), "!timeout");
        assert_eq!(fresh.view().indices(), vec![0, 2]);
    }

    #[test]
    fn test_filter_change_supersedes_background_evaluation() {
        let mut view = LogView::load(LOG, &ViewDesc::new());
        let gate = view.gate().clone();
        let background = gate.issue();

        view.set_filter("retry");
        assert_eq!(view.view().indices(), vec![2]);
        assert_eq!(gate.publish(background, ()), None);
    }

    #[test]
    fn test_from_source() {
        let mut source = TextSource::new("fixture", LOG);
        let view = LogView::from_source(&mut source, &ViewDesc::new()).unwrap();
        assert_eq!(view.entries()[1].original_line_numbers, vec![3, 4]);
    }
}
