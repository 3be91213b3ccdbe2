//! The filter mini-language: `||`-separated segments of include terms,
//! `!` exclude terms, `#a::#b` row/date ranges and `#gap=<seconds>`.

mod ast;
mod eval;
mod gate;
mod parse;

pub use ast::{DateBound, DateRange, FilterAst, MatchTerm, RangeBound, RowRange};
pub use eval::{
    DEFAULT_PARALLEL_THRESHOLD, EvalOptions, FilteredView, LevelSet, ViewRow, evaluate,
    matches_entry,
};
pub use gate::{EvaluationGate, Ticket};
pub use parse::{parse_filter, parse_time_end, parse_time_start};
