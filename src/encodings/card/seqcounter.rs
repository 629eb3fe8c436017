//! # Sequential Counter Encoding
//!
//! For `n` input literals and bound `r < n`, the counter uses a grid of
//! `(n - r) * r` register variables `s[j][k]`, allocated row by row. Register
//! `s[j][k]` being true means that at least `k + 1` of the inputs
//! `x[0..=j + k]` are true.
//!
//! ## References
//!
//! - Carsten Sinz: _Towards an Optimal CNF Encoding of Boolean Cardinality Constraints_, CP 2005.

use log::debug;

use crate::{
    clause,
    encodings::{CollectClauses, Error},
    instances::ManageVars,
    types::{Clause, Lit},
};

/// The polarity of the register literals in the counter. Lower bounds are
/// encoded as upper bounds on the negated inputs with negated registers, so
/// that both halves of an exactly constraint read the same way in the CNF.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Direction {
    /// Registers appear with their natural polarity
    #[default]
    AtMost,
    /// Registers appear negated
    AtLeast,
}

impl Direction {
    fn register(self, lit: Lit) -> Lit {
        match self {
            Direction::AtMost => lit,
            Direction::AtLeast => !lit,
        }
    }
}

/// Encodes that at most `bound` of `lits` are true
///
/// # Errors
///
/// - [`Error::InvalidBound`] unless `bound < lits.len()`
/// - If the collector fails
pub fn at_most<Col>(
    lits: &[Lit],
    bound: usize,
    collector: &mut Col,
    var_manager: &mut dyn ManageVars,
) -> Result<(), Error>
where
    Col: CollectClauses + ?Sized,
{
    at_most_directed(lits, bound, Direction::AtMost, collector, var_manager)
}

/// Encodes that at most `bound` of `lits` are true with the register polarity
/// given by `direction`. Allocates exactly `(n - bound) * bound` variables.
///
/// # Errors
///
/// - [`Error::InvalidBound`] unless `bound < lits.len()`
/// - If the collector fails
pub fn at_most_directed<Col>(
    lits: &[Lit],
    bound: usize,
    direction: Direction,
    collector: &mut Col,
    var_manager: &mut dyn ManageVars,
) -> Result<(), Error>
where
    Col: CollectClauses + ?Sized,
{
    let n = lits.len();
    if bound >= n {
        return Err(Error::InvalidBound { bound, n_lits: n });
    }
    let rows = n - bound;
    debug!(
        "sequential counter: {n} inputs, bound {bound}, {} registers ({direction:?})",
        rows * bound
    );
    let regs: Vec<Lit> = (0..rows * bound)
        .map(|_| direction.register(var_manager.new_lit()))
        .collect();
    let s = |j: usize, k: usize| regs[j * bound + k];

    // s[j][k] -> s[j + 1][k]
    let chain = (0..rows.saturating_sub(1))
        .flat_map(|j| (0..bound).map(move |k| (j, k)))
        .map(|(j, k)| clause![!s(j, k), s(j + 1, k)]);
    collector.extend_clauses(chain)?;

    // x[j + k] & s[j][k - 1] -> s[j][k]
    let coupling = (0..rows)
        .flat_map(|j| (0..=bound).map(move |k| (j, k)))
        .map(|(j, k)| {
            let mut cl: Clause = clause![!lits[j + k]];
            if k > 0 {
                cl.add(!s(j, k - 1));
            }
            if k < bound {
                cl.add(s(j, k));
            }
            cl
        });
    collector.extend_clauses(coupling)
}

/// Encodes that at least `bound` of `lits` are true, as at most
/// `n - bound` of the negated literals
///
/// # Errors
///
/// - [`Error::InvalidBound`] if `bound > lits.len()`
/// - If the collector fails
pub fn at_least<Col>(
    lits: &[Lit],
    bound: usize,
    collector: &mut Col,
    var_manager: &mut dyn ManageVars,
) -> Result<(), Error>
where
    Col: CollectClauses + ?Sized,
{
    let n = lits.len();
    if bound > n {
        return Err(Error::InvalidBound { bound, n_lits: n });
    }
    if bound == 0 {
        return Ok(());
    }
    if bound == n {
        return collector.extend_clauses(lits.iter().map(|&l| clause![l]));
    }
    let negated: Vec<Lit> = lits.iter().map(|&l| !l).collect();
    at_most_directed(&negated, n - bound, Direction::AtLeast, collector, var_manager)
}

/// Encodes that exactly `bound` of `lits` are true
///
/// # Errors
///
/// - [`Error::InvalidBound`] if `bound > lits.len()`
/// - If the collector fails
pub fn exactly<Col>(
    lits: &[Lit],
    bound: usize,
    collector: &mut Col,
    var_manager: &mut dyn ManageVars,
) -> Result<(), Error>
where
    Col: CollectClauses + ?Sized,
{
    let n = lits.len();
    if bound > n {
        return Err(Error::InvalidBound { bound, n_lits: n });
    }
    if bound == 0 {
        return collector.extend_clauses(lits.iter().map(|&l| clause![!l]));
    }
    if bound == n {
        return collector.extend_clauses(lits.iter().map(|&l| clause![l]));
    }
    at_most_directed(lits, bound, Direction::AtMost, collector, var_manager)?;
    at_least(lits, bound, collector, var_manager)
}
