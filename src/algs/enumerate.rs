//! # All-Solutions Enumeration
//!
//! Enumerates the solutions of a solver instance projected onto a list of
//! literals. After each solution, a blocking clause guarded by a fresh
//! selector variable `b` is added and `¬b` is assumed in subsequent calls, so
//! the blocking clauses are only active while enumerating.

use bitvec::prelude::*;
use log::{debug, trace};

use super::Error;
use crate::{
    instances::ManageVars,
    solvers::{Solve, SolveIncremental, SolverResult},
    types::{Clause, Lit, RsHashSet},
};

/// The largest projection [`all_sat`] accepts, since the truth table has
/// `2^p` bits
pub const MAX_ALL_SAT_VARS: usize = 24;

/// Iterator over the projected solutions of a solver instance. Bit `i` of
/// each item is the value of the `i`-th projection literal; literals the
/// solver leaves unassigned read as false.
pub struct Enumerator<'a, S: SolveIncremental + ?Sized> {
    solver: &'a mut S,
    var_manager: &'a mut dyn ManageVars,
    projection: Vec<Lit>,
    assumptions: Vec<Lit>,
    selectors: Vec<Lit>,
    limit: Option<usize>,
    n_found: usize,
    done: bool,
}

impl<'a, S: SolveIncremental + ?Sized> Enumerator<'a, S> {
    /// Creates an enumerator over the solutions projected onto `projection`.
    /// Selector variables are allocated from `var_manager`, which has to
    /// cover every variable of the solver instance.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if a variable occurs more than once in the
    /// projection, in either polarity
    pub fn new(
        solver: &'a mut S,
        var_manager: &'a mut dyn ManageVars,
        projection: &[Lit],
    ) -> Result<Self, Error> {
        check_projection(projection)?;
        Ok(Self {
            solver,
            var_manager,
            projection: projection.to_vec(),
            assumptions: vec![],
            selectors: vec![],
            limit: None,
            n_found: 0,
            done: false,
        })
    }

    /// Only enumerates solutions that satisfy the given assumptions
    #[must_use]
    pub fn with_assumptions(mut self, assumptions: &[Lit]) -> Self {
        self.assumptions.extend_from_slice(assumptions);
        self
    }

    /// Stops after `limit` solutions
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// The number of solutions found so far
    #[must_use]
    pub fn n_found(&self) -> usize {
        self.n_found
    }

    /// Permanently disables the blocking clauses added so far by asserting
    /// their selectors, and returns the selectors. Enumeration continues
    /// afterwards, but can find the same solutions again.
    ///
    /// # Errors
    ///
    /// If the solver fails to add the unit clauses.
    pub fn release(&mut self) -> Result<Vec<Lit>, Error> {
        let selectors = std::mem::take(&mut self.selectors);
        for &sel in &selectors {
            self.solver.add_unit(sel)?;
        }
        self.assumptions
            .retain(|&l| !selectors.iter().any(|&sel| l == !sel));
        debug!("released {} blocking clauses", selectors.len());
        Ok(selectors)
    }

    /// Reads the projected model and blocks it
    fn take_solution(&mut self) -> Result<BitVec<u64, Lsb0>, Error> {
        let mut bits = BitVec::with_capacity(self.projection.len());
        let sel = self.var_manager.new_lit();
        let mut block = Clause::new();
        block.add(sel);
        for &lit in &self.projection {
            let val = self.solver.lit_val(lit)?.to_bool_with_def(false);
            bits.push(val);
            block.add(if val { !lit } else { lit });
        }
        self.solver.reserve(sel.var())?;
        self.solver.add_clause(block)?;
        self.selectors.push(sel);
        self.assumptions.push(!sel);
        Ok(bits)
    }
}

/// A projection is a set of variables, so each may appear only once
fn check_projection(projection: &[Lit]) -> Result<(), Error> {
    let mut seen = RsHashSet::default();
    for &lit in projection {
        if !seen.insert(lit.var()) {
            return Err(Error::InvalidArgument(format!(
                "variable {} occurs more than once in the projection",
                lit.var()
            )));
        }
    }
    Ok(())
}

impl<S: SolveIncremental + ?Sized> Iterator for Enumerator<'_, S> {
    type Item = Result<BitVec<u64, Lsb0>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.limit.is_some_and(|limit| self.n_found >= limit) {
            return None;
        }
        let res = match self.solver.solve_assumps(&self.assumptions) {
            Ok(res) => res,
            Err(err) => {
                self.done = true;
                return Some(Err(Error::Backend(err)));
            }
        };
        match res {
            SolverResult::Unsat => {
                debug!("enumeration finished after {} solutions", self.n_found);
                self.done = true;
                None
            }
            SolverResult::Interrupted => {
                self.done = true;
                Some(Err(Error::Interrupted))
            }
            SolverResult::Sat => {
                let sol = self.take_solution();
                match &sol {
                    Ok(bits) => {
                        self.n_found += 1;
                        trace!("solution {}: {bits}", self.n_found);
                    }
                    Err(_) => self.done = true,
                }
                Some(sol)
            }
        }
    }
}

/// Calls `visitor` on every projected solution under `assumptions` until it
/// returns `false`. Returns the number of visited solutions.
///
/// # Errors
///
/// - [`Error::InvalidArgument`] if the projection repeats a variable
/// - [`Error::Interrupted`] if a solver call is interrupted
/// - If the solver fails
pub fn visit_solutions<S, F>(
    solver: &mut S,
    var_manager: &mut dyn ManageVars,
    projection: &[Lit],
    assumptions: &[Lit],
    mut visitor: F,
) -> Result<usize, Error>
where
    S: SolveIncremental + ?Sized,
    F: FnMut(&BitSlice<u64, Lsb0>) -> bool,
{
    let mut enumerator =
        Enumerator::new(solver, var_manager, projection)?.with_assumptions(assumptions);
    let mut n_visited = 0;
    for sol in &mut enumerator {
        let sol = sol?;
        n_visited += 1;
        if !visitor(&sol) {
            break;
        }
    }
    Ok(n_visited)
}

/// Computes the truth table of the solver instance projected onto
/// `projection` under `assumptions`: bit `Σ b_i·2^i` is set iff the
/// assignment with `projection[i] = b_i` extends to a solution.
///
/// # Errors
///
/// - [`Error::InvalidArgument`] if the projection has more than
///   [`MAX_ALL_SAT_VARS`] literals or repeats a variable
/// - [`Error::Interrupted`] if a solver call is interrupted
/// - If the solver fails
pub fn all_sat<S>(
    solver: &mut S,
    var_manager: &mut dyn ManageVars,
    projection: &[Lit],
    assumptions: &[Lit],
) -> Result<BitVec<u64, Lsb0>, Error>
where
    S: SolveIncremental + ?Sized,
{
    let p = projection.len();
    if p > MAX_ALL_SAT_VARS {
        return Err(Error::InvalidArgument(format!(
            "projection of {p} literals exceeds the maximum of {MAX_ALL_SAT_VARS}"
        )));
    }
    check_projection(projection)?;
    let mut table = bitvec![u64, Lsb0; 0; 1 << p];
    let n = visit_solutions(solver, var_manager, projection, assumptions, |sol| {
        let idx = sol.iter_ones().fold(0usize, |idx, i| idx | (1 << i));
        table.set(idx, true);
        true
    })?;
    debug!("all-sat over {p} literals: {n} solutions");
    Ok(table)
}
