//! Output formatters for commands with non-trivial human rendering.

pub mod search_results;

pub use search_results::{SearchReport, SearchReportItem};
