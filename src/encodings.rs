//! # CNF Encodings for Logic Synthesis
//!
//! Gate (Tseytin) encodings, cardinality constraints, and translations of
//! decision diagrams and and-inverter graphs to CNF.
//!
//! All encoders share the same calling convention: they take a clause
//! collector implementing [`CollectClauses`] (a [`Cnf`](crate::instances::Cnf)
//! or any solver) and a [`ManageVars`](crate::instances::ManageVars) from which
//! auxiliary variables are allocated. Gate encodings are pure functions
//! returning clauses and do not need either.

use thiserror::Error;

use crate::types::Clause;

pub mod aig;
pub mod am1;
pub mod bdd;
pub mod card;
pub mod gates;

/// Trait for all data structures that clauses can be collected into. This is
/// implemented for [`Cnf`](crate::instances::Cnf) and every solver.
pub trait CollectClauses {
    /// Gets the number of clauses in the collection
    fn n_clauses(&self) -> usize;

    /// Extends the clause collector with an iterator of clauses
    ///
    /// # Errors
    ///
    /// If the collector fails to accept a clause, e.g., a solver backend error.
    fn extend_clauses<T>(&mut self, cl_iter: T) -> Result<(), Error>
    where
        T: IntoIterator<Item = Clause>;

    /// Adds a single clause to the collector
    ///
    /// # Errors
    ///
    /// If the collector fails to accept the clause.
    fn add_clause(&mut self, cl: Clause) -> Result<(), Error> {
        self.extend_clauses([cl])
    }
}

/// Errors from encodings
#[derive(Error, Debug)]
pub enum Error {
    /// The requested bound is outside the range the encoding supports for the
    /// given number of literals
    #[error("bound {bound} is invalid for {n_lits} literals")]
    InvalidBound {
        /// The requested bound
        bound: usize,
        /// The number of input literals
        n_lits: usize,
    },
    /// An input to the encoding is malformed
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The clause collector failed
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Brute-force projection of a small CNF onto its first `n_inputs` variables.
/// Entry `i` is true if the input pattern with bits `i` extends to a model over
/// the variables `0..n_vars`.
#[cfg(test)]
pub(crate) fn satisfiable_inputs(
    cnf: &crate::instances::Cnf,
    n_inputs: u32,
    n_vars: u32,
) -> Vec<bool> {
    use crate::types::{Assignment, TernaryVal};
    assert!(n_vars <= 24, "brute force over too many variables");
    let mut sat = vec![false; 1 << n_inputs];
    for bits in 0..(1u64 << n_vars) {
        let inputs = usize::try_from(bits & ((1 << n_inputs) - 1)).unwrap();
        if !sat[inputs] && cnf.evaluate(&Assignment::from_bits(bits, n_vars)) == TernaryVal::True {
            sat[inputs] = true;
        }
    }
    sat
}

/// Unit propagation over a small CNF starting from `units`. Returns `None` on
/// a conflict.
#[cfg(test)]
pub(crate) fn propagate(
    cnf: &crate::instances::Cnf,
    units: &[crate::types::Lit],
) -> Option<crate::types::Assignment> {
    use crate::types::{Assignment, TernaryVal};
    let mut assign: Assignment = units.iter().copied().collect();
    if units.iter().any(|&l| assign.lit_value(l) != TernaryVal::True) {
        return None;
    }
    loop {
        let mut changed = false;
        for cl in cnf {
            let mut open = None;
            let mut n_open = 0;
            let mut satisfied = false;
            for &l in cl {
                match assign.lit_value(l) {
                    TernaryVal::True => satisfied = true,
                    TernaryVal::DontCare => {
                        n_open += 1;
                        open = Some(l);
                    }
                    TernaryVal::False => (),
                }
            }
            if satisfied {
                continue;
            }
            match (n_open, open) {
                (0, _) => return None,
                (1, Some(l)) => {
                    assign.assign_lit(l);
                    changed = true;
                }
                _ => (),
            }
        }
        if !changed {
            return Some(assign);
        }
    }
}
