use cirkit_sat::{
    encodings::aig::{self, AigNodeMaps, AigView, ExternalAigCnf, Options},
    instances::{BasicVarManager, ManageVars},
    ipasir_lit,
    types::Lit,
};
use cirkit_sat_batsat::BasicSolver;

mod common;
use common::{not, Aig};

/// Full adder with outputs `sum`, `carry` and the complemented carry
fn full_adder() -> Aig {
    let mut aig = Aig::new(3);
    let (a, b, cin) = (aig.input(0), aig.input(1), aig.input(2));
    let t = aig.xor(a, b);
    let sum = aig.xor(t, cin);
    let g = aig.and(a, b);
    let p = aig.and(t, cin);
    let carry = aig.or(g, p);
    aig.add_output(sum);
    aig.add_output(carry);
    aig.add_output(not(carry));
    aig
}

fn io_table(aig: &Aig, n_in: usize, n_out: usize) -> bitvec::vec::BitVec<u64> {
    let outputs = aig.outputs();
    common::table_from(n_in + n_out, |x| {
        outputs
            .iter()
            .enumerate()
            .all(|(i, &out)| x[n_in + i] == aig.eval(out, &x[..n_in]))
    })
}

fn projection(mapping: &aig::AigCnfMapping) -> Vec<Lit> {
    let mut lits = mapping.inputs.clone();
    lits.extend(&mapping.outputs);
    lits
}

#[test_log::test]
fn full_adder_relation() {
    let aig = full_adder();
    let mut var_manager = BasicVarManager::default();
    let mut solver = BasicSolver::default();
    let mapping =
        aig::encode_aig(&aig, Options::default(), &mut solver, &mut var_manager).unwrap();
    assert_eq!(mapping.inputs.len(), 3);
    assert_eq!(mapping.outputs.len(), 3);
    assert!(mapping.selectors.is_empty());
    // one variable per input and reachable and node, plus the complemented output
    assert_eq!(var_manager.n_used() as usize, 3 + aig.n_ands() + 1);

    let table =
        common::truth_table(&mut solver, &mut var_manager, &projection(&mapping), &[]);
    assert_eq!(table, io_table(&aig, 3, 3));
}

#[test]
fn selectors_enable_gates() {
    let aig = full_adder();
    let mut var_manager = BasicVarManager::default();
    let mut solver = BasicSolver::default();
    let options = Options {
        blocking_vars: true,
    };
    let mapping = aig::encode_aig(&aig, options, &mut solver, &mut var_manager).unwrap();
    assert_eq!(mapping.selectors.len(), aig.n_ands());

    let proj = projection(&mapping);
    let table = common::truth_table(&mut solver, &mut var_manager, &proj, &mapping.selectors);
    assert_eq!(table, io_table(&aig, 3, 3));

    // with every gate disabled only the output inverter constrains the outputs
    let off: Vec<Lit> = mapping.selectors.iter().map(|&s| !s).collect();
    let table = common::truth_table(&mut solver, &mut var_manager, &proj, &off);
    let expected = common::table_from(6, |x| x[5] != x[4]);
    assert_eq!(table, expected);
}

#[test]
fn copies_share_selectors() {
    let aig = full_adder();
    let mut var_manager = BasicVarManager::default();
    let mut solver = BasicSolver::default();
    let options = Options {
        blocking_vars: true,
    };
    let mut maps = AigNodeMaps::default();
    let first =
        aig::encode_aig_with(&aig, options, &mut maps, &mut solver, &mut var_manager).unwrap();
    let used = var_manager.n_used();
    let second =
        aig::encode_aig_with(&aig, options, &mut maps, &mut solver, &mut var_manager).unwrap();
    assert_eq!(second.selectors, first.selectors);
    assert_eq!(maps.selectors.len(), aig.n_ands());
    // the second copy adds inputs, and nodes and the inverted output only
    assert_eq!(var_manager.n_used(), 2 * used - aig.n_ands() as u32);
    for (out, &lit) in aig.outputs().into_iter().zip(&second.outputs) {
        if !out.complemented {
            assert_eq!(maps.node_lits[&out.node], lit);
        }
    }

    for mapping in [&first, &second] {
        let proj = projection(mapping);
        let table = common::truth_table(&mut solver, &mut var_manager, &proj, &first.selectors);
        assert_eq!(table, io_table(&aig, 3, 3));
    }

    // the selectors of the first copy switch off the second one
    let off: Vec<Lit> = first.selectors.iter().map(|&s| !s).collect();
    let table = common::truth_table(&mut solver, &mut var_manager, &projection(&second), &off);
    assert_eq!(table, common::table_from(6, |x| x[5] != x[4]));
}

#[test]
fn constant_outputs() {
    let mut aig = Aig::new(1);
    let zero = aig.constant();
    let x = aig.input(0);
    let dead = aig.and(x, zero);
    aig.add_output(zero);
    aig.add_output(not(zero));
    aig.add_output(dead);

    let mut var_manager = BasicVarManager::default();
    let mut solver = BasicSolver::default();
    let mapping =
        aig::encode_aig(&aig, Options::default(), &mut solver, &mut var_manager).unwrap();
    let table =
        common::truth_table(&mut solver, &mut var_manager, &projection(&mapping), &[]);
    let expected = common::table_from(4, |x| !x[1] && x[2] && !x[3]);
    assert_eq!(table, expected);
}

#[test]
fn external_cnf_after_encoded_aig() {
    let aig = full_adder();
    let mut var_manager = BasicVarManager::default();
    let mut solver = BasicSolver::default();
    let first =
        aig::encode_aig(&aig, Options::default(), &mut solver, &mut var_manager).unwrap();
    let offset = var_manager.n_used();

    // c = a & b over variables a = 0, b = 1, c = 2
    let external = ExternalAigCnf {
        clauses: vec![vec![5, 0], vec![5, 2], vec![4, 1, 3]],
        n_vars: 3,
        input_vars: vec![0, 1],
        output_vars: vec![2],
    };
    let second = external.add_to(&mut solver, &mut var_manager).unwrap();
    assert_eq!(var_manager.n_used(), offset + 3);
    assert_eq!(
        second.inputs,
        vec![ipasir_lit![offset as i32 + 1], ipasir_lit![offset as i32 + 2]]
    );
    assert_eq!(second.outputs, vec![ipasir_lit![offset as i32 + 3]]);

    let table =
        common::truth_table(&mut solver, &mut var_manager, &projection(&second), &[]);
    let expected = common::table_from(3, |x| x[2] == (x[0] && x[1]));
    assert_eq!(table, expected);

    // the earlier translation is untouched
    let table = common::truth_table(&mut solver, &mut var_manager, &projection(&first), &[]);
    assert_eq!(table, io_table(&aig, 3, 3));
}
