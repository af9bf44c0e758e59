//! The index artifact: term statistics and how they are built.

pub mod builder;
pub mod term_stats;
pub mod tokenize;

pub use builder::{build_index, static_score};
pub use term_stats::TermStats;
pub use tokenize::tokenize;
