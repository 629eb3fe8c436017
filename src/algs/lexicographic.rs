//! # Lexicographically Extremal Solutions
//!
//! Finds the lexicographically smallest or largest assignment of a list of
//! literals, reading `vars[p - 1]` as the most significant position. Starting
//! from any solution, the positions are visited from most to least
//! significant; each position that could still improve is flipped under
//! assumptions fixing all more significant positions.

use bitvec::prelude::*;
use log::debug;

use super::Error;
use crate::{
    solvers::{Solve, SolveIncremental, SolverResult},
    types::Lit,
};

/// The lexicographically smallest assignment of `vars` under `assumptions`,
/// or `None` if the instance is unsatisfiable
///
/// # Errors
///
/// - [`Error::Interrupted`] if a solver call is interrupted
/// - If the solver fails
pub fn lexicographic_smallest<S>(
    solver: &mut S,
    vars: &[Lit],
    assumptions: &[Lit],
) -> Result<Option<BitVec<u64, Lsb0>>, Error>
where
    S: SolveIncremental + ?Sized,
{
    extremal(solver, vars, assumptions, true)
}

/// The lexicographically largest assignment of `vars` under `assumptions`,
/// or `None` if the instance is unsatisfiable
///
/// # Errors
///
/// - [`Error::Interrupted`] if a solver call is interrupted
/// - If the solver fails
pub fn lexicographic_largest<S>(
    solver: &mut S,
    vars: &[Lit],
    assumptions: &[Lit],
) -> Result<Option<BitVec<u64, Lsb0>>, Error>
where
    S: SolveIncremental + ?Sized,
{
    extremal(solver, vars, assumptions, false)
}

fn extremal<S>(
    solver: &mut S,
    vars: &[Lit],
    assumptions: &[Lit],
    smallest: bool,
) -> Result<Option<BitVec<u64, Lsb0>>, Error>
where
    S: SolveIncremental + ?Sized,
{
    let mut sat_calls = 1;
    if !solve(solver, assumptions)? {
        return Ok(None);
    }
    let mut best = extract(solver, vars)?;

    for d in (0..vars.len()).rev() {
        // already at the preferred value
        if best[d] != smallest {
            continue;
        }
        let mut local = assumptions.to_vec();
        local.extend(
            (d + 1..vars.len()).map(|j| if best[j] { vars[j] } else { !vars[j] }),
        );
        local.push(if smallest { !vars[d] } else { vars[d] });
        sat_calls += 1;
        if solve(solver, &local)? {
            best = extract(solver, vars)?;
        }
    }
    debug!(
        "lexicographic {} solution after {sat_calls} sat calls: {best}",
        if smallest { "smallest" } else { "largest" }
    );
    Ok(Some(best))
}

fn solve<S>(solver: &mut S, assumptions: &[Lit]) -> Result<bool, Error>
where
    S: SolveIncremental + ?Sized,
{
    match solver.solve_assumps(assumptions)? {
        SolverResult::Sat => Ok(true),
        SolverResult::Unsat => Ok(false),
        SolverResult::Interrupted => Err(Error::Interrupted),
    }
}

fn extract<S>(solver: &S, vars: &[Lit]) -> Result<BitVec<u64, Lsb0>, Error>
where
    S: SolveIncremental + ?Sized,
{
    vars.iter()
        .map(|&l| Ok(solver.lit_val(l)?.to_bool_with_def(false)))
        .collect()
}
