//! # Pairwise At-Most-One and One-Hot Encodings
//!
//! ## References
//!
//! - Steven D. Prestwich: _CNF Encodings_, in Handbook of Satisfiability 2021.

use itertools::Itertools;

use super::{CollectClauses, Error};
use crate::{
    clause,
    types::{Clause, Lit},
};

/// Encodes that at most one of `lits` is true with the `n(n-1)/2` binary
/// clauses `{¬li, ¬lj}` for `i < j`
///
/// # Errors
///
/// If the collector fails.
pub fn at_most_one<Col>(lits: &[Lit], collector: &mut Col) -> Result<(), Error>
where
    Col: CollectClauses + ?Sized,
{
    collector.extend_clauses(
        lits.iter()
            .tuple_combinations()
            .map(|(&a, &b)| clause![!a, !b]),
    )
}

/// Encodes that exactly one of `lits` is true: the clause over all `lits`
/// followed by [`at_most_one`]
///
/// # Errors
///
/// If the collector fails.
pub fn one_hot<Col>(lits: &[Lit], collector: &mut Col) -> Result<(), Error>
where
    Col: CollectClauses + ?Sized,
{
    collector.add_clause(lits.iter().copied().collect::<Clause>())?;
    at_most_one(lits, collector)
}

#[cfg(test)]
mod tests {
    use crate::{
        clause,
        encodings::CollectClauses,
        instances::Cnf,
        lit,
        types::{Assignment, TernaryVal},
    };

    #[test]
    fn pairwise_clause_count() {
        let mut cnf = Cnf::new();
        super::at_most_one(&[lit![0], lit![1], lit![2], lit![3]], &mut cnf).unwrap();
        assert_eq!(cnf.n_clauses(), 6);
        assert_eq!(cnf[0], clause![!lit![0], !lit![1]]);
    }

    #[test]
    fn one_hot_semantics() {
        let lits = [lit![0], lit![1], lit![2], lit![3]];
        let mut cnf = Cnf::new();
        super::one_hot(&lits, &mut cnf).unwrap();
        for bits in 0..16u64 {
            assert_eq!(
                cnf.evaluate(&Assignment::from_bits(bits, 4)),
                TernaryVal::from(bits.count_ones() == 1)
            );
        }
    }

    #[test]
    fn at_most_one_semantics() {
        let lits = [lit![0], !lit![1], lit![2]];
        let mut cnf = Cnf::new();
        super::at_most_one(&lits, &mut cnf).unwrap();
        for bits in 0..8u64 {
            let n_true = (bits ^ 0b010).count_ones();
            assert_eq!(
                cnf.evaluate(&Assignment::from_bits(bits, 3)),
                TernaryVal::from(n_true <= 1)
            );
        }
    }
}
