//! # refcompare
//!
//! A tolerance-based comparator for numeric text files.
//!
//! This library validates benchmark output against a reference result: both
//! files are tokenized on whitespace and compared token-by-token, with exact
//! matching for non-numeric tokens and absolute-tolerance matching for
//! numeric ones. The outcome is a structured [`Verdict`] with aggregate
//! error statistics.

pub mod file_utils;
pub mod comparison;

pub use file_utils::{detect_encoding, read_lines};
pub use comparison::{
    compare_files, compare_lines, MismatchKind, Summary, Tolerances, Verdict,
};
