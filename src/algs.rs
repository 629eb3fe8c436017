//! # SAT-Related Algorithms
//!
//! This module contains implementations of algorithms that build on top of SAT solvers.
//! The implementations here are typically intended to be relatively simple and are not optimized
//! for maximum performance.
//!
//! - [`enumerate`]: blocking-clause enumeration of all solutions projected onto
//!   a set of literals, and truth-table reconstruction with [`enumerate::all_sat`].
//! - [`lexicographic`]: lexicographically smallest and largest solutions.

use thiserror::Error;

pub mod enumerate;
pub mod lexicographic;

/// Errors from the algorithms
#[derive(Error, Debug)]
pub enum Error {
    /// An encoding step failed
    #[error("encoding failed: {0}")]
    Encoding(#[from] crate::encodings::Error),
    /// The solver backend failed
    #[error("solver failed: {0}")]
    Backend(#[from] anyhow::Error),
    /// The solver was interrupted before it reached an answer
    #[error("solver call was interrupted")]
    Interrupted,
    /// An argument is outside the supported range
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
