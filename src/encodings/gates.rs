//! # Tseytin Gate Encodings
//!
//! Each function returns the clauses defining an output literal `c` as a gate
//! over its input literals. The clauses are returned in a fixed order so that
//! generated formulas are reproducible.
//!
//! The `blocking_*` variants take the selector `sel` as their first argument
//! and add `¬sel` to every clause. The gate relation is
//! then only enforced when the selector `sel` is true; with `sel` false the
//! output is unconstrained.

use crate::{
    clause,
    types::{Clause, Lit},
};

/// Encodes `c <-> a & b`
#[must_use]
pub fn and(a: Lit, b: Lit, c: Lit) -> [Clause; 3] {
    [clause![a, !c], clause![b, !c], clause![!a, !b, c]]
}

/// Encodes `c <-> l1 & ... & ln`
#[must_use]
pub fn and_n(lits: &[Lit], c: Lit) -> Vec<Clause> {
    let mut clauses: Vec<Clause> = lits.iter().map(|&l| clause![l, !c]).collect();
    let mut big: Clause = lits.iter().map(|&l| !l).collect();
    big.add(c);
    clauses.push(big);
    clauses
}

/// Encodes `c <-> a | b`
#[must_use]
pub fn or(a: Lit, b: Lit, c: Lit) -> [Clause; 3] {
    [clause![!a, c], clause![!b, c], clause![a, b, !c]]
}

/// Encodes `c <-> l1 | ... | ln`
#[must_use]
pub fn or_n(lits: &[Lit], c: Lit) -> Vec<Clause> {
    let mut clauses: Vec<Clause> = lits.iter().map(|&l| clause![!l, c]).collect();
    let mut big: Clause = lits.iter().copied().collect();
    big.add(!c);
    clauses.push(big);
    clauses
}

/// Encodes `c <-> a ^ b`
#[must_use]
pub fn xor(a: Lit, b: Lit, c: Lit) -> [Clause; 4] {
    [
        clause![!a, b, c],
        clause![a, !b, c],
        clause![a, b, !c],
        clause![!a, !b, !c],
    ]
}

/// Encodes `c <-> !(a ^ b)`
#[must_use]
pub fn xnor(a: Lit, b: Lit, c: Lit) -> [Clause; 4] {
    [
        clause![!a, b, !c],
        clause![a, !b, !c],
        clause![a, b, c],
        clause![!a, !b, c],
    ]
}

/// Encodes `a <-> b`
#[must_use]
pub fn equals(a: Lit, b: Lit) -> [Clause; 2] {
    [clause![!a, b], clause![a, !b]]
}

/// Encodes `a <-> !b`
#[must_use]
pub fn not_equals(a: Lit, b: Lit) -> [Clause; 2] {
    [clause![a, b], clause![!a, !b]]
}

/// Adds the blocking literal `¬sel` to each clause
fn guard<I>(clauses: I, sel: Lit) -> Vec<Clause>
where
    I: IntoIterator<Item = Clause>,
{
    clauses
        .into_iter()
        .map(|mut cl| {
            cl.add(!sel);
            cl
        })
        .collect()
}

/// Encodes `sel -> (c <-> a & b)`
#[must_use]
pub fn blocking_and(sel: Lit, a: Lit, b: Lit, c: Lit) -> Vec<Clause> {
    guard(and(a, b, c), sel)
}

/// Encodes `sel -> (c <-> l1 & ... & ln)`
#[must_use]
pub fn blocking_and_n(sel: Lit, lits: &[Lit], c: Lit) -> Vec<Clause> {
    guard(and_n(lits, c), sel)
}

/// Encodes `sel -> (c <-> a | b)`
#[must_use]
pub fn blocking_or(sel: Lit, a: Lit, b: Lit, c: Lit) -> Vec<Clause> {
    guard(or(a, b, c), sel)
}

/// Encodes `sel -> (c <-> l1 | ... | ln)`
#[must_use]
pub fn blocking_or_n(sel: Lit, lits: &[Lit], c: Lit) -> Vec<Clause> {
    guard(or_n(lits, c), sel)
}

/// Encodes `sel -> (c <-> a ^ b)`
#[must_use]
pub fn blocking_xor(sel: Lit, a: Lit, b: Lit, c: Lit) -> Vec<Clause> {
    guard(xor(a, b, c), sel)
}

/// Encodes `sel -> (c <-> !(a ^ b))`
#[must_use]
pub fn blocking_xnor(sel: Lit, a: Lit, b: Lit, c: Lit) -> Vec<Clause> {
    guard(xnor(a, b, c), sel)
}
