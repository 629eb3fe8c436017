//! # Constraint Types
//!
//! The constraint types produced and consumed by the encodings. The most
//! important one is [`Clause`]; [`CardConstraint`] describes a cardinality
//! request over a pool of literals.

use std::{fmt, ops};

use super::{Assignment, Lit, TernaryVal};

/// Type representing a clause.
/// Wrapper around a std collection to allow for changing the data structure.
/// The order of literals is preserved as added.
#[derive(Eq, PartialEq, PartialOrd, Ord, Clone, Default, Hash)]
pub struct Clause {
    lits: Vec<Lit>,
}

impl Clause {
    /// Creates a new empty clause
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the clause as a slice of literals
    #[must_use]
    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    /// Gets the length of the clause
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    /// Checks if the clause is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    /// Checks if the clause is a unit clause
    #[inline]
    #[must_use]
    pub fn is_unit(&self) -> bool {
        self.lits.len() == 1
    }

    /// Adds a literal to the clause
    pub fn add(&mut self, lit: Lit) {
        self.lits.push(lit);
    }

    /// Evaluates a clause under a given assignment
    #[must_use]
    pub fn evaluate(&self, assignment: &Assignment) -> TernaryVal {
        self.iter()
            .fold(TernaryVal::False, |val, l| match assignment.lit_value(*l) {
                TernaryVal::True => TernaryVal::True,
                TernaryVal::DontCare => {
                    if val == TernaryVal::False {
                        TernaryVal::DontCare
                    } else {
                        val
                    }
                }
                TernaryVal::False => val,
            })
    }

    /// Gets an iterator over the clause
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Lit> {
        self.lits.iter()
    }

    /// Normalizes the clause. This includes sorting the literals, removing
    /// duplicates and removing the entire clause if it is a tautology.
    /// Comparing two normalized clauses checks their logical equivalence.
    #[must_use]
    pub fn normalize(mut self) -> Option<Self> {
        if self.len() <= 1 {
            return Some(self);
        }
        self.lits.sort_unstable();
        self.lits.dedup();
        // Positive lits always come first, so a tautology is two neighbours
        if self.lits.windows(2).any(|w| w[0] == !w[1]) {
            return None;
        }
        Some(self)
    }
}

impl<const N: usize> From<[Lit; N]> for Clause {
    fn from(value: [Lit; N]) -> Self {
        Self {
            lits: Vec::from(value),
        }
    }
}

impl From<&[Lit]> for Clause {
    fn from(value: &[Lit]) -> Self {
        Self {
            lits: Vec::from(value),
        }
    }
}

impl Extend<Lit> for Clause {
    fn extend<T: IntoIterator<Item = Lit>>(&mut self, iter: T) {
        self.lits.extend(iter);
    }
}

impl ops::Index<usize> for Clause {
    type Output = Lit;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.lits[index]
    }
}

impl<'a> IntoIterator for &'a Clause {
    type Item = &'a Lit;

    type IntoIter = std::slice::Iter<'a, Lit>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.lits.iter()
    }
}

impl IntoIterator for Clause {
    type Item = Lit;

    type IntoIter = std::vec::IntoIter<Lit>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.lits.into_iter()
    }
}

impl FromIterator<Lit> for Clause {
    fn from_iter<T: IntoIterator<Item = Lit>>(iter: T) -> Self {
        Self {
            lits: Vec::from_iter(iter),
        }
    }
}

/// Clauses can be printed with the [`Display`](std::fmt::Display) trait
impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, lit) in self.iter().enumerate() {
            if i != 0 {
                write!(f, "|")?;
            }
            write!(f, "{lit}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Debug for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Creates a clause from a list of literals
///
/// # Examples
///
/// ```
/// use cirkit_sat::{clause, lit};
///
/// let cl = clause![lit![0], !lit![1]];
/// assert_eq!(cl.len(), 2);
/// ```
#[macro_export]
macro_rules! clause {
    () => {
        $crate::types::Clause::new()
    };
    ( $($l:expr),* ) => {
        {
            let mut tmp_clause = $crate::types::Clause::new();
            $(
                tmp_clause.add($l);
            )*
            tmp_clause
        }
    };
}

/// The relation of a [`CardConstraint`]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CardRelation {
    /// At most `bound` literals are true
    Ub,
    /// At least `bound` literals are true
    Lb,
    /// Exactly `bound` literals are true
    Eq,
}

/// A cardinality constraint request: a relation between the number of true
/// literals in a pool and a bound
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct CardConstraint {
    lits: Vec<Lit>,
    bound: usize,
    relation: CardRelation,
}

impl CardConstraint {
    /// Constructs a new "at most `bound`" constraint
    pub fn new_ub<LI: IntoIterator<Item = Lit>>(lits: LI, bound: usize) -> Self {
        Self::new(lits, bound, CardRelation::Ub)
    }

    /// Constructs a new "at least `bound`" constraint
    pub fn new_lb<LI: IntoIterator<Item = Lit>>(lits: LI, bound: usize) -> Self {
        Self::new(lits, bound, CardRelation::Lb)
    }

    /// Constructs a new "exactly `bound`" constraint
    pub fn new_eq<LI: IntoIterator<Item = Lit>>(lits: LI, bound: usize) -> Self {
        Self::new(lits, bound, CardRelation::Eq)
    }

    fn new<LI: IntoIterator<Item = Lit>>(lits: LI, bound: usize, relation: CardRelation) -> Self {
        Self {
            lits: lits.into_iter().collect(),
            bound,
            relation,
        }
    }

    /// Gets the literal pool of the constraint
    #[must_use]
    pub fn lits(&self) -> &[Lit] {
        &self.lits
    }

    /// Gets the bound of the constraint
    #[must_use]
    pub fn bound(&self) -> usize {
        self.bound
    }

    /// Gets the relation of the constraint
    #[must_use]
    pub fn relation(&self) -> CardRelation {
        self.relation
    }

    /// Gets the number of literals in the pool
    #[must_use]
    pub fn len(&self) -> usize {
        self.lits.len()
    }

    /// Checks if the literal pool is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lits.is_empty()
    }

    /// Checks whether the constraint is trivially satisfied by every assignment
    #[must_use]
    pub fn is_tautology(&self) -> bool {
        match self.relation {
            CardRelation::Ub => self.bound >= self.lits.len(),
            CardRelation::Lb => self.bound == 0,
            CardRelation::Eq => false,
        }
    }

    /// Checks whether the constraint cannot be satisfied by any assignment
    #[must_use]
    pub fn is_unsat(&self) -> bool {
        match self.relation {
            CardRelation::Ub => false,
            CardRelation::Lb | CardRelation::Eq => self.bound > self.lits.len(),
        }
    }

    /// Evaluates the constraint under a given assignment. Returns
    /// [`TernaryVal::DontCare`] if an unassigned literal could change the
    /// outcome.
    #[must_use]
    pub fn evaluate(&self, assignment: &Assignment) -> TernaryVal {
        let (n_true, n_open) =
            self.lits
                .iter()
                .fold((0, 0), |(t, o), l| match assignment.lit_value(*l) {
                    TernaryVal::True => (t + 1, o),
                    TernaryVal::False => (t, o),
                    TernaryVal::DontCare => (t, o + 1),
                });
        let (min, max) = (n_true, n_true + n_open);
        let holds = |count: usize| match self.relation {
            CardRelation::Ub => count <= self.bound,
            CardRelation::Lb => count >= self.bound,
            CardRelation::Eq => count == self.bound,
        };
        if n_open == 0 {
            return TernaryVal::from(holds(min));
        }
        let all_hold = match self.relation {
            CardRelation::Ub => holds(max),
            CardRelation::Lb => holds(min),
            CardRelation::Eq => false,
        };
        let none_hold = match self.relation {
            CardRelation::Ub => !holds(min),
            CardRelation::Lb => !holds(max),
            CardRelation::Eq => self.bound < min || self.bound > max,
        };
        if all_hold {
            TernaryVal::True
        } else if none_hold {
            TernaryVal::False
        } else {
            TernaryVal::DontCare
        }
    }
}

impl fmt::Display for CardConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, lit) in self.lits.iter().enumerate() {
            if i != 0 {
                write!(f, " + ")?;
            }
            write!(f, "{lit}")?;
        }
        let rel = match self.relation {
            CardRelation::Ub => "<=",
            CardRelation::Lb => ">=",
            CardRelation::Eq => "=",
        };
        write!(f, " {rel} {}", self.bound)
    }
}
