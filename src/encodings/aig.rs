//! # AIG-to-CNF Translation
//!
//! Two ways of getting an and-inverter graph into CNF:
//!
//! - [`encode_aig`] performs a Tseytin translation over any graph exposed
//!   through [`AigView`].
//! - [`ExternalAigCnf`] imports the result of an external AIG-to-CNF
//!   generator whose clauses use the `2 * var + polarity` literal layout,
//!   shifting its variables past the ones already in use.

use std::{fmt, hash::Hash};

use log::{debug, trace};

use super::{gates, CollectClauses, Error};
use crate::{
    clause,
    instances::ManageVars,
    types::{Clause, Lit, RsHashMap, Var},
};

/// A possibly complemented reference to an AIG node
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct AigEdge<N> {
    /// The node the edge points to
    pub node: N,
    /// Whether the edge is complemented
    pub complemented: bool,
}

impl<N> AigEdge<N> {
    /// A non-complemented edge
    pub fn pos(node: N) -> Self {
        Self {
            node,
            complemented: false,
        }
    }

    /// A complemented edge
    pub fn neg(node: N) -> Self {
        Self {
            node,
            complemented: true,
        }
    }
}

/// The kind of an AIG node
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AigNode<N> {
    /// The constant-zero node
    Constant,
    /// Primary input at the given position, below [`AigView::n_inputs`]
    Input(usize),
    /// Two-input AND gate over its fan-ins
    And(AigEdge<N>, AigEdge<N>),
}

/// Read-only view of an and-inverter graph
pub trait AigView {
    /// Node handle
    type Node: Copy + Eq + Hash + fmt::Debug;

    /// The number of primary inputs
    fn n_inputs(&self) -> usize;

    /// The primary outputs in order
    fn outputs(&self) -> Vec<AigEdge<Self::Node>>;

    /// The kind of a node
    fn node(&self, node: Self::Node) -> AigNode<Self::Node>;
}

/// Options for [`encode_aig`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Options {
    /// Give every AND node a selector variable. The gate is then only
    /// enforced while its selector is true.
    pub blocking_vars: bool,
}

/// Literals of the primary inputs and outputs of a translated AIG
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AigCnfMapping {
    /// One literal per primary input
    pub inputs: Vec<Lit>,
    /// One literal per primary output
    pub outputs: Vec<Lit>,
    /// Selector literal per AND node, in translation order. Empty unless
    /// [`Options::blocking_vars`] is set.
    pub selectors: Vec<Lit>,
}

/// Per-node literals of a translated AIG. Passing the same maps to repeated
/// [`encode_aig_with`] calls over one AIG gives every AND node a single
/// selector shared by all its copies.
#[derive(Clone, Debug)]
pub struct AigNodeMaps<N> {
    /// The literal of every node reached by the last translation. Reset at the
    /// start of each translation.
    pub node_lits: RsHashMap<N, Lit>,
    /// The selector of every AND node translated with
    /// [`Options::blocking_vars`]. Existing entries are reused.
    pub selectors: RsHashMap<N, Lit>,
}

impl<N> Default for AigNodeMaps<N> {
    fn default() -> Self {
        Self {
            node_lits: RsHashMap::default(),
            selectors: RsHashMap::default(),
        }
    }
}

/// Tseytin translation of an AIG. Inputs get fresh variables in order, AND
/// nodes reached from the outputs get one fresh variable each (followed by a
/// selector with [`Options::blocking_vars`]), a complemented output gets a
/// fresh variable distinct from its node.
///
/// # Errors
///
/// - [`Error::InvalidArgument`] if a node names an input position out of range
/// - If the collector fails
pub fn encode_aig<A, Col>(
    aig: &A,
    options: Options,
    collector: &mut Col,
    var_manager: &mut dyn ManageVars,
) -> Result<AigCnfMapping, Error>
where
    A: AigView + ?Sized,
    Col: CollectClauses + ?Sized,
{
    encode_aig_with(
        aig,
        options,
        &mut AigNodeMaps::default(),
        collector,
        var_manager,
    )
}

/// Like [`encode_aig`], but records the literal of every reached node in
/// `maps.node_lits`. With [`Options::blocking_vars`], an AND node that already
/// has an entry in `maps.selectors` keeps that selector instead of getting a
/// fresh one.
///
/// # Errors
///
/// - [`Error::InvalidArgument`] if a node names an input position out of range
/// - If the collector fails
pub fn encode_aig_with<A, Col>(
    aig: &A,
    options: Options,
    maps: &mut AigNodeMaps<A::Node>,
    collector: &mut Col,
    var_manager: &mut dyn ManageVars,
) -> Result<AigCnfMapping, Error>
where
    A: AigView + ?Sized,
    Col: CollectClauses + ?Sized,
{
    let inputs: Vec<Lit> = (0..aig.n_inputs()).map(|_| var_manager.new_lit()).collect();
    let outputs = aig.outputs();
    debug!(
        "encoding aig: {} inputs, {} outputs, blocking vars {}, {} carried selectors",
        inputs.len(),
        outputs.len(),
        options.blocking_vars,
        maps.selectors.len()
    );
    let mut mapping = AigCnfMapping {
        inputs,
        outputs: Vec::with_capacity(outputs.len()),
        selectors: vec![],
    };
    let node_lits = &mut maps.node_lits;
    node_lits.clear();

    for out in outputs {
        let mut stack = vec![(out.node, false)];
        while let Some((node, fanins_done)) = stack.pop() {
            if node_lits.contains_key(&node) {
                continue;
            }
            let lit = match aig.node(node) {
                AigNode::Input(pos) => *mapping.inputs.get(pos).ok_or_else(|| {
                    Error::InvalidArgument(format!(
                        "node {node:?} is input {pos} of {}",
                        mapping.inputs.len()
                    ))
                })?,
                AigNode::Constant => {
                    let lit = var_manager.new_lit();
                    collector.add_clause(clause![!lit])?;
                    lit
                }
                AigNode::And(a, b) if !fanins_done => {
                    stack.push((node, true));
                    for fanin in [a, b] {
                        if !node_lits.contains_key(&fanin.node) {
                            stack.push((fanin.node, false));
                        }
                    }
                    continue;
                }
                AigNode::And(a, b) => {
                    let edge_lit = |e: AigEdge<A::Node>| {
                        let lit = node_lits[&e.node];
                        if e.complemented {
                            !lit
                        } else {
                            lit
                        }
                    };
                    let (a, b) = (edge_lit(a), edge_lit(b));
                    let f = var_manager.new_lit();
                    if options.blocking_vars {
                        let sel = *maps
                            .selectors
                            .entry(node)
                            .or_insert_with(|| var_manager.new_lit());
                        collector.extend_clauses(gates::blocking_and(sel, a, b, f))?;
                        mapping.selectors.push(sel);
                    } else {
                        collector.extend_clauses(gates::and(a, b, f))?;
                    }
                    trace!("aig node {node:?}: {f} = {a} & {b}");
                    f
                }
            };
            node_lits.insert(node, lit);
        }

        let lit = node_lits[&out.node];
        if out.complemented {
            let neg = var_manager.new_lit();
            collector.extend_clauses(gates::not_equals(lit, neg))?;
            mapping.outputs.push(neg);
        } else {
            mapping.outputs.push(lit);
        }
    }
    Ok(mapping)
}

/// Maps a raw `2 * var + polarity` literal to the literal of variable
/// `var + offset`, negated iff the polarity bit is set. In IPASIR numbering
/// the result is `±(var + 1 + offset)`.
///
/// # Errors
///
/// [`Error::InvalidArgument`] if the shifted variable index is too high.
pub fn remap_lit(raw: u32, offset: u32) -> Result<Lit, Error> {
    (raw >> 1)
        .checked_add(offset)
        .and_then(|idx| Lit::new_with_error(idx, raw & 1 == 1).ok())
        .ok_or_else(|| {
            Error::InvalidArgument(format!("literal {raw} shifted by {offset} out of range"))
        })
}

/// The CNF produced by an external AIG-to-CNF generator. Literals use the
/// raw `2 * var + polarity` layout, variables are numbered from zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExternalAigCnf {
    /// The clauses over raw literals
    pub clauses: Vec<Vec<u32>>,
    /// The number of variables used by the clauses
    pub n_vars: u32,
    /// The variable of each primary input
    pub input_vars: Vec<u32>,
    /// The variable of each primary output
    pub output_vars: Vec<u32>,
}

impl ExternalAigCnf {
    /// Adds the clauses to a collector, shifting all variables past the ones
    /// already used by `var_manager`, and reserves the shifted variables
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if a literal or variable is out of range
    ///   of [`ExternalAigCnf::n_vars`]
    /// - If the collector fails
    pub fn add_to<Col>(
        &self,
        collector: &mut Col,
        var_manager: &mut dyn ManageVars,
    ) -> Result<AigCnfMapping, Error>
    where
        Col: CollectClauses + ?Sized,
    {
        let offset = var_manager.n_used();
        let check = |var: u32| {
            if var < self.n_vars {
                Ok(())
            } else {
                Err(Error::InvalidArgument(format!(
                    "variable {var} exceeds the {} variables of the external cnf",
                    self.n_vars
                )))
            }
        };
        let var_lit = |var: u32| -> Result<Lit, Error> {
            check(var)?;
            remap_lit(var << 1, offset)
        };
        let inputs = self
            .input_vars
            .iter()
            .map(|&v| var_lit(v))
            .collect::<Result<Vec<_>, _>>()?;
        let outputs = self
            .output_vars
            .iter()
            .map(|&v| var_lit(v))
            .collect::<Result<Vec<_>, _>>()?;
        let clauses = self
            .clauses
            .iter()
            .map(|cl| {
                cl.iter()
                    .map(|&raw| {
                        check(raw >> 1)?;
                        remap_lit(raw, offset)
                    })
                    .collect::<Result<Clause, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        if self.n_vars > 0 {
            let last = offset.checked_add(self.n_vars - 1).ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "{} external variables do not fit after {offset} used ones",
                    self.n_vars
                ))
            })?;
            var_manager.mark_used(Var::new_with_error(last).map_err(|err| {
                Error::InvalidArgument(format!("external cnf too large: {err}"))
            })?);
        }
        debug!(
            "importing external aig cnf: {} clauses over {} variables at offset {offset}",
            clauses.len(),
            self.n_vars
        );
        collector.extend_clauses(clauses)?;
        Ok(AigCnfMapping {
            inputs,
            outputs,
            selectors: vec![],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{AigCnfMapping, AigEdge, AigNode, AigNodeMaps, AigView, ExternalAigCnf, Options};
    use crate::{
        clause,
        encodings::{satisfiable_inputs, CollectClauses, Error},
        instances::{BasicVarManager, Cnf, ManageVars},
        ipasir_lit, lit, var,
    };

    /// Node 0 is constant zero, nodes `1..=n_inputs` are inputs
    struct Graph {
        n_inputs: usize,
        ands: Vec<(AigEdge<usize>, AigEdge<usize>)>,
        outputs: Vec<AigEdge<usize>>,
    }

    impl AigView for Graph {
        type Node = usize;

        fn n_inputs(&self) -> usize {
            self.n_inputs
        }

        fn outputs(&self) -> Vec<AigEdge<usize>> {
            self.outputs.clone()
        }

        fn node(&self, node: usize) -> AigNode<usize> {
            if node == 0 {
                AigNode::Constant
            } else if node <= self.n_inputs {
                AigNode::Input(node - 1)
            } else {
                let (a, b) = self.ands[node - self.n_inputs - 1];
                AigNode::And(a, b)
            }
        }
    }

    /// `x0 ^ x1` as `!(x0 & x1) & !(!x0 & !x1)`, and `x0 & x1` as second output
    fn xor_graph() -> Graph {
        Graph {
            n_inputs: 2,
            ands: vec![
                (AigEdge::pos(1), AigEdge::pos(2)),
                (AigEdge::neg(1), AigEdge::neg(2)),
                (AigEdge::neg(3), AigEdge::neg(4)),
            ],
            outputs: vec![AigEdge::pos(5), AigEdge::pos(3)],
        }
    }

    #[test]
    fn xor_shares_nodes() {
        let aig = xor_graph();
        let mut cnf = Cnf::new();
        let mut vm = BasicVarManager::default();
        let map = super::encode_aig(&aig, Options::default(), &mut cnf, &mut vm).unwrap();
        assert_eq!(map.inputs, vec![lit![0], lit![1]]);
        assert_eq!(vm.n_used(), 5);
        assert_eq!(cnf.n_clauses(), 9);
        assert_eq!(map.outputs.len(), 2);
        assert!(map.selectors.is_empty());

        let mut xor_cnf = cnf.clone();
        xor_cnf.add_unit(map.outputs[0]);
        let sat = satisfiable_inputs(&xor_cnf, 2, vm.n_used());
        assert_eq!(sat, vec![false, true, true, false]);
        cnf.add_unit(map.outputs[1]);
        let sat = satisfiable_inputs(&cnf, 2, vm.n_used());
        assert_eq!(sat, vec![false, false, false, true]);
    }

    #[test]
    fn complemented_output_and_constant() {
        let aig = Graph {
            n_inputs: 1,
            ands: vec![(AigEdge::pos(0), AigEdge::pos(1))],
            outputs: vec![AigEdge::neg(2)],
        };
        let mut cnf = Cnf::new();
        let mut vm = BasicVarManager::default();
        let map = super::encode_aig(&aig, Options::default(), &mut cnf, &mut vm).unwrap();
        // x0 input, x1 constant, x2 and, x3 output
        assert_eq!(map.outputs, vec![lit![3]]);
        assert!(cnf.iter().any(|cl| *cl == clause![!lit![1]]));
        cnf.add_unit(map.outputs[0]);
        assert_eq!(satisfiable_inputs(&cnf, 1, vm.n_used()), vec![true, true]);
    }

    #[test]
    fn blocking_vars_follow_nodes() {
        let aig = Graph {
            n_inputs: 2,
            ands: vec![(AigEdge::pos(1), AigEdge::pos(2))],
            outputs: vec![AigEdge::pos(3)],
        };
        let mut cnf = Cnf::new();
        let mut vm = BasicVarManager::default();
        let opts = Options {
            blocking_vars: true,
        };
        let map = super::encode_aig(&aig, opts, &mut cnf, &mut vm).unwrap();
        assert_eq!(map.outputs, vec![lit![2]]);
        assert_eq!(map.selectors, vec![lit![3]]);
        // with the selector off, the output is unconstrained
        cnf.add_unit(!map.selectors[0]);
        cnf.add_unit(map.outputs[0]);
        assert_eq!(satisfiable_inputs(&cnf, 2, 4), vec![true; 4]);
    }

    #[test]
    fn carried_selectors_are_reused() {
        let aig = xor_graph();
        let mut cnf = Cnf::new();
        let mut vm = BasicVarManager::default();
        let opts = Options {
            blocking_vars: true,
        };
        let mut maps = AigNodeMaps::default();
        let first = super::encode_aig_with(&aig, opts, &mut maps, &mut cnf, &mut vm).unwrap();
        // two inputs, three and nodes with a selector each
        assert_eq!(vm.n_used(), 8);
        assert_eq!(first.selectors.len(), 3);
        assert_eq!(maps.selectors.len(), 3);
        assert_eq!(maps.node_lits.len(), 5);
        assert_eq!(maps.node_lits[&1usize], first.inputs[0]);
        assert_eq!(maps.node_lits[&5usize], first.outputs[0]);
        for node in 3..=5usize {
            assert!(first.selectors.contains(&maps.selectors[&node]));
        }

        let second = super::encode_aig_with(&aig, opts, &mut maps, &mut cnf, &mut vm).unwrap();
        // only inputs and and nodes are new
        assert_eq!(vm.n_used(), 13);
        assert_eq!(second.selectors, first.selectors);
        assert_eq!(maps.selectors.len(), 3);
        assert_eq!(maps.node_lits[&1usize], second.inputs[0]);
        assert_eq!(maps.node_lits[&5usize], second.outputs[0]);
        assert_ne!(second.outputs, first.outputs);
    }

    #[test]
    fn node_lits_without_selectors() {
        let aig = xor_graph();
        let mut cnf = Cnf::new();
        let mut vm = BasicVarManager::default();
        let mut maps = AigNodeMaps::default();
        let map =
            super::encode_aig_with(&aig, Options::default(), &mut maps, &mut cnf, &mut vm)
                .unwrap();
        assert!(maps.selectors.is_empty());
        assert_eq!(maps.node_lits[&3usize], map.outputs[1]);
        assert_eq!(maps.node_lits[&2usize], lit![1]);
        assert!(!maps.node_lits.contains_key(&0usize));
    }

    #[test]
    fn remap_convention() {
        for offset in [0, 3, 100] {
            for v in 0..5u32 {
                for p in 0..2u32 {
                    let lit = super::remap_lit(2 * v + p, offset).unwrap();
                    let ipasir = i32::try_from(v + 1 + offset).unwrap();
                    let expected = if p == 1 { -ipasir } else { ipasir };
                    assert_eq!(lit.to_ipasir(), expected);
                }
            }
        }
        assert_eq!(super::remap_lit(7, 4).unwrap(), ipasir_lit![-8]);
    }

    #[test]
    fn external_cnf_is_shifted() {
        // x0 = x1 & x2 over three variables
        let ext = ExternalAigCnf {
            clauses: vec![vec![1, 2], vec![1, 4], vec![0, 3, 5]],
            n_vars: 3,
            input_vars: vec![1, 2],
            output_vars: vec![0],
        };
        let mut cnf = Cnf::new();
        let mut vm = BasicVarManager::from_next_free(var![4]);
        let map = ext.add_to(&mut cnf, &mut vm).unwrap();
        assert_eq!(
            map,
            AigCnfMapping {
                inputs: vec![lit![5], lit![6]],
                outputs: vec![lit![4]],
                selectors: vec![],
            }
        );
        assert_eq!(vm.n_used(), 7);
        assert_eq!(cnf[0], clause![!lit![4], lit![5]]);
        assert_eq!(cnf[2], clause![lit![4], !lit![5], !lit![6]]);
    }

    #[test]
    fn external_cnf_out_of_range() {
        let ext = ExternalAigCnf {
            clauses: vec![vec![8]],
            n_vars: 3,
            input_vars: vec![],
            output_vars: vec![],
        };
        let mut cnf = Cnf::new();
        let mut vm = BasicVarManager::default();
        assert!(matches!(
            ext.add_to(&mut cnf, &mut vm),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(vm.n_used(), 0);
    }

    #[test]
    fn external_cnf_too_many_vars() {
        let ext = ExternalAigCnf {
            clauses: vec![],
            n_vars: u32::MAX,
            input_vars: vec![],
            output_vars: vec![],
        };
        let mut cnf = Cnf::new();
        let mut vm = BasicVarManager::from_next_free(var![5]);
        assert!(matches!(
            ext.add_to(&mut cnf, &mut vm),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(vm.n_used(), 5);
        assert_eq!(cnf.n_clauses(), 0);
    }
}
