//! # BDD-to-CNF Translation
//!
//! Translates binary decision diagrams with complemented edges to CNF. Every
//! non-terminal node `v` with decision variable `x`, then-child `t` and
//! else-child `e` gets a fresh literal `f` constrained by
//!
//! - `x -> (f <-> t)`
//! - `¬x -> (f <-> e)`
//!
//! Complemented edges negate the child literal where it is used. Nodes that
//! are shared between several roots, or between several calls to the encoder,
//! are translated only once.
//!
//! The BDD package itself is reached through the [`DecisionDiagram`] trait.

use std::{fmt, hash::Hash};

use log::{debug, trace};

use super::{CollectClauses, Error};
use crate::{
    clause,
    instances::ManageVars,
    types::{Clause, Lit, RsHashMap},
};

/// Read-only navigation of a decision diagram with complemented edges. A
/// node handle may carry a complement mark; the encoder only uses handles
/// returned by [`DecisionDiagram::regular`] as memo keys.
pub trait DecisionDiagram {
    /// Node handle. Node identity must be stable while an encoder holds the
    /// manager.
    type Node: Copy + Eq + Hash + fmt::Debug;

    /// The number of decision variables of the manager
    fn n_vars(&self) -> usize;

    /// The handle with the complement mark removed
    fn regular(&self, node: Self::Node) -> Self::Node;

    /// Whether the handle carries a complement mark
    fn is_complemented(&self, node: Self::Node) -> bool;

    /// Whether the regular node is the constant-one terminal
    fn is_one(&self, node: Self::Node) -> bool;

    /// Whether the regular node is a constant-zero terminal. Managers that
    /// represent zero as the complemented one terminal keep the default.
    fn is_zero(&self, _node: Self::Node) -> bool {
        false
    }

    /// The then-edge of a regular non-terminal node
    fn then_child(&self, node: Self::Node) -> Self::Node;

    /// The else-edge of a regular non-terminal node
    fn else_child(&self, node: Self::Node) -> Self::Node;

    /// The decision variable index of a regular non-terminal node
    fn var_index(&self, node: Self::Node) -> usize;
}

/// The node-to-literal memo of a translation. It also records the input and
/// constant literals it was created with, so that it can be carried over to a
/// later [`BddEncoder`] over the same manager.
#[derive(Clone, Debug)]
pub struct BddMemo<N> {
    inputs: Vec<Lit>,
    one: Lit,
    one_emitted: bool,
    nodes: RsHashMap<N, Lit>,
}

impl<N: Copy + Eq + Hash> BddMemo<N> {
    /// Gets the literal a regular node has been translated to
    #[must_use]
    pub fn get(&self, node: N) -> Option<Lit> {
        self.nodes.get(&node).copied()
    }

    /// The number of translated nodes
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node has been translated
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over the translated nodes and their literals
    pub fn iter(&self) -> impl Iterator<Item = (N, Lit)> + '_ {
        self.nodes.iter().map(|(&n, &l)| (n, l))
    }

    /// The literals of the decision variables
    #[must_use]
    pub fn inputs(&self) -> &[Lit] {
        &self.inputs
    }

    /// The literal representing constant one
    #[must_use]
    pub fn one(&self) -> Lit {
        self.one
    }
}

/// A BDD-to-CNF translation session over one manager
pub struct BddEncoder<'mgr, D: DecisionDiagram> {
    manager: &'mgr D,
    memo: BddMemo<D::Node>,
}

impl<'mgr, D: DecisionDiagram> BddEncoder<'mgr, D> {
    /// Starts a session. Reserves one variable per decision variable of the
    /// manager, followed by one variable for constant one.
    pub fn new(manager: &'mgr D, var_manager: &mut dyn ManageVars) -> Self {
        let n = manager.n_vars();
        let inputs: Vec<Lit> = (0..n).map(|_| var_manager.new_lit()).collect();
        let one = var_manager.new_lit();
        debug!("bdd encoder: {n} inputs, constant one is {one}");
        Self {
            manager,
            memo: BddMemo {
                inputs,
                one,
                one_emitted: false,
                nodes: RsHashMap::default(),
            },
        }
    }

    /// Continues a session from the memo of an earlier one
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if the memo was created for a different
    /// number of decision variables.
    pub fn with_memo(manager: &'mgr D, memo: BddMemo<D::Node>) -> Result<Self, Error> {
        if memo.inputs.len() != manager.n_vars() {
            return Err(Error::InvalidArgument(format!(
                "memo covers {} variables but the manager has {}",
                memo.inputs.len(),
                manager.n_vars()
            )));
        }
        Ok(Self { manager, memo })
    }

    /// The memo of the session
    #[must_use]
    pub fn memo(&self) -> &BddMemo<D::Node> {
        &self.memo
    }

    /// Ends the session and returns its memo
    #[must_use]
    pub fn into_memo(self) -> BddMemo<D::Node> {
        self.memo
    }

    /// The literal of decision variable `idx`
    #[must_use]
    pub fn input(&self, idx: usize) -> Option<Lit> {
        self.memo.inputs.get(idx).copied()
    }

    /// The literals of all decision variables
    #[must_use]
    pub fn inputs(&self) -> &[Lit] {
        &self.memo.inputs
    }

    /// The literal representing constant one
    #[must_use]
    pub fn one(&self) -> Lit {
        self.memo.one
    }

    /// The number of node variables allocated so far, one per distinct
    /// non-terminal regular node
    #[must_use]
    pub fn n_nodes(&self) -> usize {
        self.memo.len()
    }

    /// Translates a root and returns the literal equivalent to it
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if a node's variable index is out of range
    /// - If the collector fails
    pub fn encode<Col>(
        &mut self,
        root: D::Node,
        collector: &mut Col,
        var_manager: &mut dyn ManageVars,
    ) -> Result<Lit, Error>
    where
        Col: CollectClauses + ?Sized,
    {
        self.emit_one(collector)?;
        let before = self.memo.len();
        self.translate(self.manager.regular(root), collector, var_manager)?;
        debug!(
            "bdd encoder: root {root:?} added {} nodes",
            self.memo.len() - before
        );
        Ok(self.edge_lit(root))
    }

    /// Translates several roots, sharing nodes between them, and returns their
    /// literals in order
    ///
    /// # Errors
    ///
    /// As [`BddEncoder::encode`].
    pub fn encode_all<Col>(
        &mut self,
        roots: &[D::Node],
        collector: &mut Col,
        var_manager: &mut dyn ManageVars,
    ) -> Result<Vec<Lit>, Error>
    where
        Col: CollectClauses + ?Sized,
    {
        let mut lits = Vec::with_capacity(roots.len());
        for &root in roots {
            lits.push(self.encode(root, collector, var_manager)?);
        }
        Ok(lits)
    }

    /// Translates several roots and asserts each of them, so that the CNF is
    /// satisfiable under an input assignment iff every root evaluates to one
    ///
    /// # Errors
    ///
    /// As [`BddEncoder::encode`].
    pub fn encode_and_assert<Col>(
        &mut self,
        roots: &[D::Node],
        collector: &mut Col,
        var_manager: &mut dyn ManageVars,
    ) -> Result<Vec<Lit>, Error>
    where
        Col: CollectClauses + ?Sized,
    {
        let lits = self.encode_all(roots, collector, var_manager)?;
        collector.extend_clauses(lits.iter().map(|&l| clause![l]))?;
        Ok(lits)
    }

    fn emit_one<Col>(&mut self, collector: &mut Col) -> Result<(), Error>
    where
        Col: CollectClauses + ?Sized,
    {
        if !self.memo.one_emitted {
            collector.add_clause(clause![self.memo.one])?;
            self.memo.one_emitted = true;
        }
        Ok(())
    }

    fn is_terminal(&self, node: D::Node) -> bool {
        self.manager.is_one(node) || self.manager.is_zero(node)
    }

    /// The literal of an edge whose regular node is already translated
    fn edge_lit(&self, edge: D::Node) -> Lit {
        let node = self.manager.regular(edge);
        let lit = if self.manager.is_one(node) {
            self.memo.one
        } else if self.manager.is_zero(node) {
            !self.memo.one
        } else {
            self.memo
                .get(node)
                .expect("children are translated before their parents")
        };
        if self.manager.is_complemented(edge) {
            !lit
        } else {
            lit
        }
    }

    /// Post-order translation of the nodes below a regular root
    fn translate<Col>(
        &mut self,
        root: D::Node,
        collector: &mut Col,
        var_manager: &mut dyn ManageVars,
    ) -> Result<(), Error>
    where
        Col: CollectClauses + ?Sized,
    {
        if self.is_terminal(root) || self.memo.nodes.contains_key(&root) {
            return Ok(());
        }
        let mgr = self.manager;
        let mut stack = vec![(root, false)];
        while let Some((node, children_done)) = stack.pop() {
            if self.memo.nodes.contains_key(&node) {
                continue;
            }
            if !children_done {
                stack.push((node, true));
                for child in [mgr.then_child(node), mgr.else_child(node)] {
                    let child = mgr.regular(child);
                    if !self.is_terminal(child) && !self.memo.nodes.contains_key(&child) {
                        stack.push((child, false));
                    }
                }
                continue;
            }

            let var_idx = mgr.var_index(node);
            let x = self.input(var_idx).ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "node {node:?} decides variable {var_idx} but the manager has {}",
                    self.memo.inputs.len()
                ))
            })?;
            let t = self.edge_lit(mgr.then_child(node));
            let e = self.edge_lit(mgr.else_child(node));
            let f = var_manager.new_lit();
            trace!("bdd node {node:?}: {f} = ite({x}, {t}, {e})");
            collector.extend_clauses(self.branch(x, t, f))?;
            collector.extend_clauses(self.branch(!x, e, f))?;
            self.memo.nodes.insert(node, f);
        }
        Ok(())
    }

    /// Clauses for `cond -> (f <-> child)`, simplified for constant children
    fn branch(&self, cond: Lit, child: Lit, f: Lit) -> Vec<Clause> {
        let one = self.memo.one;
        if child == one {
            vec![clause![!cond, f]]
        } else if child == !one {
            vec![clause![!cond, !f]]
        } else {
            vec![clause![!cond, !child, f], clause![!cond, child, !f]]
        }
    }
}
