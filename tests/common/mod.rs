#![allow(dead_code)]

use bitvec::prelude::*;
use cirkit_sat::{
    algs::enumerate,
    encodings::{
        aig::{AigEdge, AigNode, AigView},
        bdd::DecisionDiagram,
    },
    instances::ManageVars,
    types::{Lit, RsHashMap},
};
use cirkit_sat_batsat::BasicSolver;

/// Truth table of the solver instance projected onto `lits`
pub fn truth_table(
    solver: &mut BasicSolver,
    var_manager: &mut dyn ManageVars,
    lits: &[Lit],
    assumptions: &[Lit],
) -> BitVec<u64, Lsb0> {
    enumerate::all_sat(solver, var_manager, lits, assumptions).unwrap()
}

/// Builds a truth table over `n` inputs from a predicate on the input bits
pub fn table_from<F: Fn(&[bool]) -> bool>(n: usize, f: F) -> BitVec<u64, Lsb0> {
    (0..1usize << n)
        .map(|idx| {
            let bits: Vec<bool> = (0..n).map(|i| idx >> i & 1 == 1).collect();
            f(&bits)
        })
        .collect()
}

/// Reduced ordered BDD with complemented edges. Handle `2 * i + c` is node
/// `i`, complemented iff `c == 1`. Node 0 is the one terminal, then-edges are
/// kept regular.
pub struct Bdd {
    n_vars: usize,
    nodes: Vec<(usize, u32, u32)>,
    unique: RsHashMap<(usize, u32, u32), u32>,
}

impl Bdd {
    pub const ONE: u32 = 0;
    pub const ZERO: u32 = 1;

    pub fn new(n_vars: usize) -> Self {
        Self {
            n_vars,
            nodes: vec![(usize::MAX, Self::ONE, Self::ONE)],
            unique: RsHashMap::default(),
        }
    }

    pub fn mk_node(&mut self, var: usize, then: u32, els: u32) -> u32 {
        if then == els {
            return then;
        }
        if then & 1 == 1 {
            return self.mk_node(var, then ^ 1, els ^ 1) ^ 1;
        }
        if let Some(&node) = self.unique.get(&(var, then, els)) {
            return node;
        }
        self.nodes.push((var, then, els));
        let node = 2 * (self.nodes.len() as u32 - 1);
        self.unique.insert((var, then, els), node);
        node
    }

    pub fn var(&mut self, var: usize) -> u32 {
        self.mk_node(var, Self::ONE, Self::ZERO)
    }

    /// Shannon expansion of a truth table, variable 0 on top
    pub fn from_table(&mut self, table: &BitSlice<u64, Lsb0>) -> u32 {
        assert_eq!(table.len(), 1 << self.n_vars);
        self.expand(table, 0, 0)
    }

    fn expand(&mut self, table: &BitSlice<u64, Lsb0>, var: usize, prefix: usize) -> u32 {
        if var == self.n_vars {
            return if table[prefix] { Self::ONE } else { Self::ZERO };
        }
        let then = self.expand(table, var + 1, prefix | 1 << var);
        let els = self.expand(table, var + 1, prefix);
        self.mk_node(var, then, els)
    }

    pub fn eval(&self, mut node: u32, inputs: &[bool]) -> bool {
        let mut negate = false;
        loop {
            negate ^= node & 1 == 1;
            let (var, then, els) = self.nodes[(node / 2) as usize];
            if node / 2 == 0 {
                return !negate;
            }
            node = if inputs[var] { then } else { els };
        }
    }

    /// The number of distinct internal nodes below the roots
    pub fn count_nodes(&self, roots: &[u32]) -> usize {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack: Vec<u32> = roots.iter().map(|&r| r / 2).collect();
        let mut count = 0;
        while let Some(idx) = stack.pop() {
            if idx == 0 || seen[idx as usize] {
                continue;
            }
            seen[idx as usize] = true;
            count += 1;
            let (_, then, els) = self.nodes[idx as usize];
            stack.push(then / 2);
            stack.push(els / 2);
        }
        count
    }
}

impl DecisionDiagram for Bdd {
    type Node = u32;

    fn n_vars(&self) -> usize {
        self.n_vars
    }

    fn regular(&self, node: u32) -> u32 {
        node & !1
    }

    fn is_complemented(&self, node: u32) -> bool {
        node & 1 == 1
    }

    fn is_one(&self, node: u32) -> bool {
        node == Self::ONE
    }

    fn then_child(&self, node: u32) -> u32 {
        self.nodes[(node / 2) as usize].1
    }

    fn else_child(&self, node: u32) -> u32 {
        self.nodes[(node / 2) as usize].2
    }

    fn var_index(&self, node: u32) -> usize {
        self.nodes[(node / 2) as usize].0
    }
}

/// Structurally hashed and-inverter graph. Node 0 is constant zero, nodes
/// `1..=n` are the inputs.
pub struct Aig {
    n_inputs: usize,
    nodes: Vec<AigNode<usize>>,
    strash: RsHashMap<(AigEdge<usize>, AigEdge<usize>), usize>,
    outputs: Vec<AigEdge<usize>>,
}

impl Aig {
    pub fn new(n_inputs: usize) -> Self {
        let mut nodes = vec![AigNode::Constant];
        nodes.extend((0..n_inputs).map(AigNode::Input));
        Self {
            n_inputs,
            nodes,
            strash: RsHashMap::default(),
            outputs: vec![],
        }
    }

    pub fn input(&self, pos: usize) -> AigEdge<usize> {
        AigEdge::pos(pos + 1)
    }

    pub fn constant(&self) -> AigEdge<usize> {
        AigEdge::pos(0)
    }

    pub fn and(&mut self, a: AigEdge<usize>, b: AigEdge<usize>) -> AigEdge<usize> {
        let key = if (a.node, a.complemented) <= (b.node, b.complemented) {
            (a, b)
        } else {
            (b, a)
        };
        if let Some(&node) = self.strash.get(&key) {
            return AigEdge::pos(node);
        }
        self.nodes.push(AigNode::And(key.0, key.1));
        let node = self.nodes.len() - 1;
        self.strash.insert(key, node);
        AigEdge::pos(node)
    }

    pub fn or(&mut self, a: AigEdge<usize>, b: AigEdge<usize>) -> AigEdge<usize> {
        let and = self.and(not(a), not(b));
        not(and)
    }

    pub fn xor(&mut self, a: AigEdge<usize>, b: AigEdge<usize>) -> AigEdge<usize> {
        let both = self.and(a, b);
        let neither = self.and(not(a), not(b));
        self.and(not(both), not(neither))
    }

    pub fn add_output(&mut self, edge: AigEdge<usize>) {
        self.outputs.push(edge);
    }

    pub fn n_ands(&self) -> usize {
        self.nodes.len() - 1 - self.n_inputs
    }

    pub fn eval(&self, edge: AigEdge<usize>, inputs: &[bool]) -> bool {
        let val = match self.nodes[edge.node] {
            AigNode::Constant => false,
            AigNode::Input(pos) => inputs[pos],
            AigNode::And(a, b) => self.eval(a, inputs) && self.eval(b, inputs),
        };
        val != edge.complemented
    }
}

pub fn not(edge: AigEdge<usize>) -> AigEdge<usize> {
    AigEdge {
        node: edge.node,
        complemented: !edge.complemented,
    }
}

impl AigView for Aig {
    type Node = usize;

    fn n_inputs(&self) -> usize {
        self.n_inputs
    }

    fn outputs(&self) -> Vec<AigEdge<usize>> {
        self.outputs.clone()
    }

    fn node(&self, node: usize) -> AigNode<usize> {
        self.nodes[node]
    }
}
