//! # cirkit-sat-batsat - BatSat Backend for cirkit-sat
//!
//! Interface to the [BatSat](https://github.com/c-cube/batsat) incremental
//! SAT solver implementing the solver traits of `cirkit-sat`.
//!
//! BatSat is fully implemented in Rust, so this backend needs no C toolchain.
//!
//! # BatSat Version
//!
//! The version of BatSat in this crate is Version 0.6.0.

#![warn(clippy::pedantic)]
#![warn(missing_docs)]

use std::time::Duration;

use batsat::{intmap::AsIndex, lbool, Callbacks, SolverInterface};
use cirkit_sat::{
    solvers::{Solve, SolveIncremental, SolveStats, SolverResult, SolverStats},
    types::{Clause, Lit, TernaryVal, Var},
};
use cpu_time::ProcessTime;

/// Wrapper for [`batsat::BasicSolver`]
pub type BasicSolver = Solver<batsat::BasicCallbacks>;

/// Wrapper for a [`batsat::Solver`] from BatSat
///
/// BatSat variable `i + 1` stands for variable `i` of this library.
#[derive(Default)]
pub struct Solver<Cb: Callbacks> {
    internal: batsat::Solver<Cb>,
    n_sat: usize,
    n_unsat: usize,
    n_terminated: usize,
    avg_clause_len: f32,
    cpu_time: Duration,
}

impl<Cb: Callbacks> Solver<Cb> {
    /// Gets a reference to the internal [`batsat::Solver`]
    #[must_use]
    pub fn batsat_ref(&self) -> &batsat::Solver<Cb> {
        &self.internal
    }

    /// Gets a mutable reference to the internal [`batsat::Solver`]
    #[must_use]
    pub fn batsat_mut(&mut self) -> &mut batsat::Solver<Cb> {
        &mut self.internal
    }

    #[allow(clippy::cast_precision_loss)]
    #[inline]
    fn update_avg_clause_len(&mut self, clause: &Clause) {
        let n = SolveStats::n_clauses(self) as f32;
        self.avg_clause_len = (self.avg_clause_len * n + clause.len() as f32) / (n + 1.);
    }

    fn to_batsat(&mut self, lit: Lit) -> batsat::Lit {
        batsat::Lit::new(self.internal.var_of_int(lit.vidx32() + 1), lit.is_pos())
    }

    fn solve_track_stats(&mut self, assumps: &[Lit]) -> SolverResult {
        let a: Vec<_> = assumps.iter().map(|&l| self.to_batsat(l)).collect();

        let start = ProcessTime::now();
        let ret = match self.internal.solve_limited(&a) {
            x if x == lbool::TRUE => {
                self.n_sat += 1;
                SolverResult::Sat
            }
            x if x == lbool::FALSE => {
                self.n_unsat += 1;
                SolverResult::Unsat
            }
            x if x == lbool::UNDEF => {
                self.n_terminated += 1;
                SolverResult::Interrupted
            }
            _ => unreachable!(),
        };
        self.cpu_time += start.elapsed();
        ret
    }
}

impl<Cb: Callbacks> Solve for Solver<Cb> {
    fn signature(&self) -> &'static str {
        "BatSat 0.6.0"
    }

    fn reserve(&mut self, max_var: Var) -> anyhow::Result<()> {
        self.internal.var_of_int(max_var.idx32() + 1);
        Ok(())
    }

    fn solve(&mut self) -> anyhow::Result<SolverResult> {
        Ok(self.solve_track_stats(&[]))
    }

    fn lit_val(&self, lit: Lit) -> anyhow::Result<TernaryVal> {
        if lit.vidx() + 1 >= self.internal.num_vars() as usize {
            return Ok(TernaryVal::DontCare);
        }
        let l = batsat::Lit::new(batsat::Var::from_index(lit.vidx() + 1), lit.is_pos());

        match self.internal.value_lit(l) {
            x if x == lbool::TRUE => Ok(TernaryVal::True),
            x if x == lbool::FALSE => Ok(TernaryVal::False),
            x if x == lbool::UNDEF => Ok(TernaryVal::DontCare),
            _ => unreachable!(),
        }
    }

    fn add_clause(&mut self, clause: Clause) -> anyhow::Result<()> {
        self.update_avg_clause_len(&clause);
        let mut c: Vec<_> = clause.iter().map(|&l| self.to_batsat(l)).collect();
        self.internal.add_clause_reuse(&mut c);
        Ok(())
    }
}

impl<Cb: Callbacks> SolveIncremental for Solver<Cb> {
    fn solve_assumps(&mut self, assumps: &[Lit]) -> anyhow::Result<SolverResult> {
        Ok(self.solve_track_stats(assumps))
    }

    fn core(&mut self) -> anyhow::Result<Vec<Lit>> {
        Ok(self
            .internal
            .unsat_core()
            .iter()
            .map(|l| Lit::new(l.var().idx() - 1, !l.sign()))
            .collect::<Vec<_>>())
    }
}

impl<Cb: Callbacks> SolveStats for Solver<Cb> {
    fn stats(&self) -> SolverStats {
        SolverStats {
            n_sat: self.n_sat,
            n_unsat: self.n_unsat,
            n_terminated: self.n_terminated,
            n_clauses: self.n_clauses(),
            max_var: self.max_var(),
            avg_clause_len: self.avg_clause_len,
            cpu_solve_time: self.cpu_time,
        }
    }

    fn n_sat_solves(&self) -> usize {
        self.n_sat
    }

    fn n_unsat_solves(&self) -> usize {
        self.n_unsat
    }

    fn n_terminated(&self) -> usize {
        self.n_terminated
    }

    fn n_clauses(&self) -> usize {
        usize::try_from(self.internal.num_clauses()).expect("more than `usize::MAX` clauses")
    }

    fn max_var(&self) -> Option<Var> {
        let num = self.internal.num_vars();
        if num > 1 {
            // BatSat variable 0 is unused
            Some(Var::new(num - 2))
        } else {
            None
        }
    }

    fn cpu_solve_time(&self) -> Duration {
        self.cpu_time
    }
}
