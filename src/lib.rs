//! # cirkit-sat - CNF Encodings and SAT Algorithms for Logic Synthesis
//!
//! `cirkit-sat` builds CNF formulas for SAT-based synthesis and verification of
//! combinational circuits and drives incremental SAT solvers over them.
//!
//! ## Overview
//!
//! - [`types`]: variables, literals, clauses, assignments and cardinality
//!   constraint requests.
//! - [`instances`]: the variable manager threaded through every encoder and
//!   the [`instances::Cnf`] clause collection.
//! - [`encodings`]: Tseytin gate encodings, cardinality constraints,
//!   BDD-to-CNF and AIG-to-CNF translation.
//! - [`solvers`]: the traits a SAT solver backend implements.
//! - [`algs`]: blocking-clause enumeration of all solutions and lexicographic
//!   extremal solutions.
//!
//! ## Example
//!
//! ```
//! use cirkit_sat::{
//!     encodings::{card, CollectClauses},
//!     instances::{BasicVarManager, Cnf},
//!     lit, var,
//! };
//!
//! let mut var_manager = BasicVarManager::from_next_free(var![3]);
//! let mut cnf = Cnf::new();
//! card::seqcounter::exactly(&[lit![0], lit![1], lit![2]], 2, &mut cnf, &mut var_manager)
//!     .unwrap();
//! assert!(cnf.n_clauses() > 0);
//! ```
//!
//! ## Features
//!
//! | Feature name | Description |
//! | --- | --- |
//! | `fxhash` | Use the faster firefox hash function from `rustc-hash` for internal maps. |

#![warn(missing_docs)]

pub mod algs;
pub mod encodings;
pub mod instances;
pub mod solvers;
pub mod types;
