//! # Interfaces to SAT Solvers
//!
//! This module holds the traits a SAT solver backend implements to be driven
//! by the encodings and algorithms of this library. A solver implementing
//! [`Solve`] and [`SolveStats`] is a clause collector, so encoders can write
//! straight into it.
//!
//! ## Available Solvers
//!
//! - [BatSat](https://github.com/c-cube/batsat): a pure-Rust MiniSat
//!   derivative, wrapped in the `cirkit-sat-batsat` crate.
//!
//! ## Example
//!
//! ```
//! use cirkit_sat::{
//!     clause, lit,
//!     solvers::{Solve, SolveIncremental, SolverResult},
//!     types::TernaryVal,
//! };
//!
//! let mut solver = cirkit_sat_batsat::BasicSolver::default();
//! solver.add_clause(clause![lit![0], lit![1]]).unwrap();
//! solver.add_clause(clause![!lit![1]]).unwrap();
//! assert_eq!(solver.solve().unwrap(), SolverResult::Sat);
//! assert_eq!(solver.lit_val(lit![0]).unwrap(), TernaryVal::True);
//! assert_eq!(solver.solve_assumps(&[!lit![0]]).unwrap(), SolverResult::Unsat);
//! ```

use core::time::Duration;
use std::fmt;

use crate::{
    clause,
    encodings::{CollectClauses, Error},
    instances::Cnf,
    types::{Assignment, Clause, Lit, TernaryVal, Var},
};

/// Trait for all SAT solvers in this library.
pub trait Solve {
    /// Gets a signature of the solver implementation
    #[must_use]
    fn signature(&self) -> &'static str;

    /// Reserves memory in the solver until a maximum variables, if the solver
    /// implementation supports it. Variables up to `max_var` are then known to
    /// the solver even if they do not appear in any clause.
    ///
    /// # Errors
    ///
    /// If the solver backend fails.
    fn reserve(&mut self, _max_var: Var) -> anyhow::Result<()> {
        Ok(())
    }

    /// Solves the internal CNF formula without any limits.
    ///
    /// # Errors
    ///
    /// If the solver backend fails.
    fn solve(&mut self) -> anyhow::Result<SolverResult>;

    /// Gets a solution found by the solver up to a specified highest variable.
    ///
    /// # Errors
    ///
    /// - If the solver is not in the satisfied state
    /// - A specific implementation might return other errors
    fn solution(&self, high_var: Var) -> anyhow::Result<Assignment> {
        let len = high_var.idx32() + 1;
        let mut assignment = Vec::with_capacity(len as usize);
        for idx in 0..len {
            assignment.push(self.lit_val(Lit::positive(idx))?);
        }
        Ok(Assignment::from(assignment))
    }

    /// Same as [`Solve::lit_val`], but for variables.
    ///
    /// # Errors
    ///
    /// As [`Solve::lit_val`].
    fn var_val(&self, var: Var) -> anyhow::Result<TernaryVal> {
        self.lit_val(var.pos_lit())
    }

    /// Gets an assignment of a variable in the solver. Variables the solver
    /// does not know about are reported as [`TernaryVal::DontCare`].
    ///
    /// # Errors
    ///
    /// - If the solver is not in the satisfied state
    /// - A specific implementation might return other errors
    fn lit_val(&self, lit: Lit) -> anyhow::Result<TernaryVal>;

    /// Adds a clause to the solver.
    ///
    /// # Errors
    ///
    /// If the solver backend rejects the clause.
    fn add_clause(&mut self, clause: Clause) -> anyhow::Result<()>;

    /// Adds a unit clause to the solver.
    ///
    /// # Errors
    ///
    /// As [`Solve::add_clause`].
    fn add_unit(&mut self, lit: Lit) -> anyhow::Result<()> {
        self.add_clause(clause![lit])
    }

    /// Adds all clauses from a [`Cnf`] instance.
    ///
    /// # Errors
    ///
    /// As [`Solve::add_clause`].
    fn add_cnf(&mut self, cnf: Cnf) -> anyhow::Result<()> {
        cnf.into_iter().try_for_each(|cl| self.add_clause(cl))
    }
}

/// Trait for all SAT solvers in this library that can solve under
/// assumptions.
pub trait SolveIncremental: Solve {
    /// Solves the internal CNF formula under assumptions.
    ///
    /// # Errors
    ///
    /// If the solver backend fails.
    fn solve_assumps(&mut self, assumps: &[Lit]) -> anyhow::Result<SolverResult>;

    /// Gets a core found by an unsatisfiable query. A core is a clause entailed
    /// by the formula that contains only inverted literals of the assumptions.
    ///
    /// # Errors
    ///
    /// If the solver is not in the unsatisfied state.
    fn core(&mut self) -> anyhow::Result<Vec<Lit>>;
}

/// Solver statistics
#[derive(Clone, PartialEq, Default, Debug)]
pub struct SolverStats {
    /// The number of satisfiable queries executed
    pub n_sat: usize,
    /// The number of unsatisfiable queries executed
    pub n_unsat: usize,
    /// The number of terminated queries executed
    pub n_terminated: usize,
    /// The number of clauses in the solver
    pub n_clauses: usize,
    /// The highest variable in the solver
    pub max_var: Option<Var>,
    /// The average length of the clauses added to the solver
    pub avg_clause_len: f32,
    /// The total CPU time spent solving
    pub cpu_solve_time: Duration,
}

/// Trait for solvers that track certain statistics.
pub trait SolveStats {
    /// Gets the available statistics from the solver
    fn stats(&self) -> SolverStats;

    /// Gets the number of satisfiable queries executed.
    fn n_sat_solves(&self) -> usize {
        self.stats().n_sat
    }

    /// Gets the number of unsatisfiable queries executed.
    fn n_unsat_solves(&self) -> usize {
        self.stats().n_unsat
    }

    /// Gets the number of queries that were prematurely terminated.
    fn n_terminated(&self) -> usize {
        self.stats().n_terminated
    }

    /// Gets the total number of queries executed.
    fn n_solves(&self) -> usize {
        self.n_sat_solves() + self.n_unsat_solves() + self.n_terminated()
    }

    /// Gets the number of clauses in the solver.
    fn n_clauses(&self) -> usize {
        self.stats().n_clauses
    }

    /// Gets the variable with the highest index in the solver, if any.
    fn max_var(&self) -> Option<Var> {
        self.stats().max_var
    }

    /// Get number of variables.
    fn n_vars(&self) -> usize {
        match self.max_var() {
            Some(var) => var.idx() + 1,
            None => 0,
        }
    }

    /// Gets the total CPU time spent solving.
    fn cpu_solve_time(&self) -> Duration {
        self.stats().cpu_solve_time
    }
}

/// Return value for solving queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolverResult {
    /// The query was found satisfiable.
    Sat,
    /// The query was found unsatisfiable.
    Unsat,
    /// The query was prematurely interrupted.
    Interrupted,
}

impl fmt::Display for SolverResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverResult::Sat => write!(f, "SAT"),
            SolverResult::Unsat => write!(f, "UNSAT"),
            SolverResult::Interrupted => write!(f, "Interrupted"),
        }
    }
}

impl<S: Solve + SolveStats> CollectClauses for S {
    fn n_clauses(&self) -> usize {
        SolveStats::n_clauses(self)
    }

    fn extend_clauses<T>(&mut self, cl_iter: T) -> Result<(), Error>
    where
        T: IntoIterator<Item = Clause>,
    {
        cl_iter
            .into_iter()
            .try_for_each(|cl| Solve::add_clause(self, cl).map_err(Error::Backend))
    }
}
