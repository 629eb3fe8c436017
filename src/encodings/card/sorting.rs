//! # Pairwise Cardinality Network
//!
//! A pairwise sorting network built from one-directional comparators: if `k`
//! inputs are true, the first `k` outputs are forced true. Asserting the
//! negation of output `r` therefore encodes "at most `r`".
//!
//! ## References
//!
//! - Michael Codish and Moshe Zazon-Ivry: _Pairwise Cardinality Networks_, LPAR 2010.

use log::debug;

use crate::{
    clause,
    encodings::{gates, CollectClauses, Error},
    instances::ManageVars,
    types::Lit,
};

/// Builds a pairwise sorting network over `lits` and returns its outputs in
/// descending order. Inputs of a length that is not a power of two are padded
/// with a fresh literal that is asserted false.
///
/// # Errors
///
/// If the collector fails.
pub fn pairwise_network<Col>(
    lits: &[Lit],
    collector: &mut Col,
    var_manager: &mut dyn ManageVars,
) -> Result<Vec<Lit>, Error>
where
    Col: CollectClauses + ?Sized,
{
    let n = lits.len();
    if n == 0 {
        return Ok(vec![]);
    }
    let width = n.next_power_of_two();
    let mut inputs = lits.to_vec();
    if width > n {
        let pad = var_manager.new_lit();
        collector.add_clause(clause![!pad])?;
        inputs.resize(width, pad);
    }
    debug!("pairwise network: {n} inputs, width {width}");
    let mut outputs: Vec<Lit> = (0..width).map(|_| var_manager.new_lit()).collect();
    sort(&inputs, &outputs, collector, var_manager)?;
    outputs.truncate(n);
    Ok(outputs)
}

/// Encodes that at most `bound` of `lits` are true with a pairwise network
///
/// # Errors
///
/// - [`Error::InvalidBound`] unless `bound < lits.len()`
/// - If the collector fails
pub fn at_most_network<Col>(
    lits: &[Lit],
    bound: usize,
    collector: &mut Col,
    var_manager: &mut dyn ManageVars,
) -> Result<(), Error>
where
    Col: CollectClauses + ?Sized,
{
    if bound >= lits.len() {
        return Err(Error::InvalidBound {
            bound,
            n_lits: lits.len(),
        });
    }
    let outputs = pairwise_network(lits, collector, var_manager)?;
    collector.add_clause(clause![!outputs[bound]])
}

/// `a | b -> c` and `a & b -> d`
fn comparator<Col>(a: Lit, b: Lit, c: Lit, d: Lit, collector: &mut Col) -> Result<(), Error>
where
    Col: CollectClauses + ?Sized,
{
    collector.extend_clauses([clause![c, !a], clause![c, !b], clause![d, !a, !b]])
}

fn new_lits(n: usize, var_manager: &mut dyn ManageVars) -> Vec<Lit> {
    (0..n).map(|_| var_manager.new_lit()).collect()
}

/// Sorts `ins` into `outs`, both of the same power-of-two length
fn sort<Col>(
    ins: &[Lit],
    outs: &[Lit],
    collector: &mut Col,
    var_manager: &mut dyn ManageVars,
) -> Result<(), Error>
where
    Col: CollectClauses + ?Sized,
{
    let n = ins.len();
    debug_assert_eq!(n, outs.len());
    if n == 1 {
        return collector.extend_clauses(gates::equals(ins[0], outs[0]));
    }
    let half = n / 2;
    let maxs = new_lits(half, var_manager);
    let mins = new_lits(half, var_manager);
    let sorted_maxs = new_lits(half, var_manager);
    let sorted_mins = new_lits(half, var_manager);
    for i in 0..half {
        comparator(ins[2 * i], ins[2 * i + 1], maxs[i], mins[i], collector)?;
    }
    sort(&maxs, &sorted_maxs, collector, var_manager)?;
    sort(&mins, &sorted_mins, collector, var_manager)?;
    merge(&sorted_maxs, &sorted_mins, outs, collector, var_manager)
}

/// Merges two sorted sequences `a` and `b` of length `n` with `a[i] >= b[i]`
/// into `outs` of length `2n`
fn merge<Col>(
    a: &[Lit],
    b: &[Lit],
    outs: &[Lit],
    collector: &mut Col,
    var_manager: &mut dyn ManageVars,
) -> Result<(), Error>
where
    Col: CollectClauses + ?Sized,
{
    let n = a.len();
    debug_assert_eq!(n, b.len());
    debug_assert_eq!(2 * n, outs.len());
    if n == 1 {
        collector.extend_clauses(gates::equals(a[0], outs[0]))?;
        return collector.extend_clauses(gates::equals(b[0], outs[1]));
    }

    let mut evens = Vec::with_capacity(n);
    evens.push(outs[0]);
    evens.extend(new_lits(n - 1, var_manager));
    let mut odds = new_lits(n - 1, var_manager);
    odds.push(outs[2 * n - 1]);

    let (a_even, a_odd): (Vec<Lit>, Vec<Lit>) = a.chunks(2).map(|p| (p[0], p[1])).unzip();
    let (b_even, b_odd): (Vec<Lit>, Vec<Lit>) = b.chunks(2).map(|p| (p[0], p[1])).unzip();
    merge(&a_even, &b_even, &evens, collector, var_manager)?;
    merge(&a_odd, &b_odd, &odds, collector, var_manager)?;

    for i in 0..n - 1 {
        comparator(
            odds[i],
            evens[i + 1],
            outs[2 * i + 1],
            outs[2 * i + 2],
            collector,
        )?;
    }
    collector.extend_clauses(outs.windows(2).map(|w| clause![w[0], !w[1]]))
}
