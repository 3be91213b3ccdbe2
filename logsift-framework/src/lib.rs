//! # logsift-framework
//!
//! Turns raw client log text into structured entries and narrows them with a
//! compact filter language.
//!
//! ## Overview
//!
//! Logs from desktop, mobile and embedded clients arrive in many line layouts.
//! The framework folds them into [`Entry`] records (one per timestamped line,
//! continuation lines attached) and evaluates filter strings against them,
//! producing a [`FilteredView`] with context rows and gap annotations.
//!
//! ## Core Concepts
//!
//! ### Pipeline
//!
//! - **[`split_lines`]**: separates the header block (`User:`, `Account:`, ...)
//!   and numbers the remaining non-blank lines
//! - **[`EntryAssembler`]**: folds numbered lines into entries; can be fed in batches
//! - **[`parse_filter`]**: filter string to [`FilterAst`], never fails
//! - **[`evaluate`]**: entries + AST + [`EvalOptions`] to a [`FilteredView`]
//! - **[`SearchCursor`]**: OR-search over the view with a non-wrapping cursor
//!
//! ### Filter language
//!
//! Segments are separated by `||`:
//!
//! - `text`: include term (any include term must match)
//! - `!text`: exclude term
//! - `#10::#500`, `#10::`, `::#500`: row range over physical line numbers
//! - `#2024-01-01::#2024-01-02 10:00:00`: date range (either side may be a row)
//! - `#gap=2.5`: flag rows more than 2.5s after the previous timestamped row
//!
//! Malformed segments degrade to include terms; evaluation never errors.
//!
//! ## Quick Start
//!
//! ```rust
//! use logsift_framework::{LogView, ViewDesc};
//!
//! let text = "2025-01-01 10:00:00.000 [Net] [7] [99] connect ok\n\
//!             2025-01-01 10:00:01.000 [Net] [7] [99] timeout\n";
//!
//! let mut view = LogView::load(text, &ViewDesc::new());
//! view.set_filter("connect||!timeout");
//! assert_eq!(view.view().indices(), vec![0]);
//! ```
//!
//! ## Performance
//!
//! - **Built-once patterns**: every regex is compiled into a static on first use
//! - **Parallel filtering**: above [`DEFAULT_PARALLEL_THRESHOLD`] entries the
//!   match pass runs on rayon
//! - **Superseding**: [`LogView`] runs every re-evaluation through an
//!   [`EvaluationGate`]; a host evaluating on a worker thread shares the gate
//!   via [`LogView::gate`] so a newer filter discards the stale result

mod assembler;
mod derived;
mod entry;
pub mod filter;
mod loader;
mod search;
mod session;
mod view;

pub use assembler::{EntryAssembler, assemble, assemble_in_batches};
pub use derived::{DerivedTime, derive_time};
pub use entry::Entry;
pub use filter::{
    DEFAULT_PARALLEL_THRESHOLD, EvalOptions, EvaluationGate, FilterAst, FilteredView, LevelSet,
    Ticket, ViewRow, evaluate, parse_filter,
};
pub use loader::{
    HEADER_SCAN_LINES, HeaderFields, LineSource, SourceLine, SplitLines, TextSource,
    split_line_seq, split_lines,
};
pub use search::{CursorState, SearchCursor, find_matches, parse_search_terms};
pub use session::{FILTER_KEY, FilterSession, MemoryStore, SessionStore};
pub use view::{DEFAULT_BATCH_SIZE, DEFAULT_CONTEXT_LINES, LogView, ViewDesc};

// parser types that appear in public signatures
pub use logsift_parser::{LineFormat, LogLevel};
