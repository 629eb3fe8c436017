//! # CNF Encodings for Cardinality Constraints
//!
//! - [`seqcounter`]: Sinz' sequential counter for at-most, at-least and
//!   exactly constraints.
//! - [`sorting`]: a pairwise cardinality (sorting) network.
//!
//! [`encode_card`] dispatches a [`CardConstraint`] request to the sequential
//! counter, treating trivially satisfied bounds as no-ops.

use log::debug;

use super::{CollectClauses, Error};
use crate::{
    instances::ManageVars,
    types::{CardConstraint, CardRelation},
};

pub mod seqcounter;
pub mod sorting;

/// Encodes a cardinality constraint with the sequential counter
///
/// # Errors
///
/// - [`Error::InvalidBound`] if a lower or equality bound exceeds the number
///   of literals, which makes the constraint unsatisfiable
/// - If the collector fails
pub fn encode_card<Col>(
    constraint: &CardConstraint,
    collector: &mut Col,
    var_manager: &mut dyn ManageVars,
) -> Result<(), Error>
where
    Col: CollectClauses + ?Sized,
{
    debug!("encoding cardinality constraint {constraint}");
    let lits = constraint.lits();
    let bound = constraint.bound();
    match constraint.relation() {
        CardRelation::Ub => {
            if bound >= lits.len() {
                return Ok(());
            }
            seqcounter::at_most(lits, bound, collector, var_manager)
        }
        CardRelation::Lb => seqcounter::at_least(lits, bound, collector, var_manager),
        CardRelation::Eq => seqcounter::exactly(lits, bound, collector, var_manager),
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        encodings::{satisfiable_inputs, CollectClauses, Error},
        instances::{BasicVarManager, Cnf, ManageVars},
        lit,
        types::CardConstraint,
        var,
    };

    #[test]
    fn trivial_upper_bound_is_noop() {
        let mut cnf = Cnf::new();
        let mut vm = BasicVarManager::from_next_free(var![3]);
        let constr = CardConstraint::new_ub([lit![0], lit![1], lit![2]], 3);
        super::encode_card(&constr, &mut cnf, &mut vm).unwrap();
        assert_eq!(cnf.n_clauses(), 0);
        assert_eq!(vm.n_used(), 3);
    }

    #[test]
    fn unsat_lower_bound() {
        let mut cnf = Cnf::new();
        let mut vm = BasicVarManager::from_next_free(var![2]);
        let constr = CardConstraint::new_lb([lit![0], lit![1]], 3);
        assert!(matches!(
            super::encode_card(&constr, &mut cnf, &mut vm),
            Err(Error::InvalidBound {
                bound: 3,
                n_lits: 2
            })
        ));
    }

    #[test]
    fn dispatch_matches_constraint() {
        let lits = [lit![0], lit![1], lit![2], lit![3]];
        for bound in 0..=4 {
            for constr in [
                CardConstraint::new_ub(lits, bound),
                CardConstraint::new_lb(lits, bound),
                CardConstraint::new_eq(lits, bound),
            ] {
                let mut cnf = Cnf::new();
                let mut vm = BasicVarManager::from_next_free(var![4]);
                super::encode_card(&constr, &mut cnf, &mut vm).unwrap();
                let sat = satisfiable_inputs(&cnf, 4, vm.n_used());
                for (bits, &is_sat) in sat.iter().enumerate() {
                    let assign = crate::types::Assignment::from_bits(bits as u64, 4);
                    assert_eq!(
                        is_sat,
                        constr.evaluate(&assign) == crate::types::TernaryVal::True,
                        "{constr} under {assign}"
                    );
                }
            }
        }
    }
}
