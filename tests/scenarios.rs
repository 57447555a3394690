//! End-to-end reproductions of the literal scenarios from the testable
//! properties section: table persistence, scratch clearing, deferred
//! delete winning over deferred merge, buffered stdout flush, an equi-join,
//! a group-by, and the boolean lattice.

use fluent::collections::{Channel, Collection, Mergeable, Scratch, Stdout, Table};
use fluent::lattice::{BoolLattice, Lattice};
use fluent::ra::{GroupBy, HashJoin, Scan, SumAgg};
use fluent::{Tuple, Value};

fn row(vals: Vec<Value>) -> Tuple {
    Tuple::new(vals)
}

#[test]
fn scenario_table_persists_across_ticks() {
    let mut t = Table::new();
    t.merge(row(vec![Value::string("a")]), 1);
    Collection::tick(&mut t, 2);
    Collection::tick(&mut t, 3);
    assert!(t.contains(&row(vec![Value::string("a")])));
}

#[test]
fn scenario_scratch_clears_every_tick() {
    let mut s = Scratch::new();
    Mergeable::merge(&mut s, vec![row(vec![Value::Int32(1)])]);
    assert_eq!(s.rows().count(), 1);
    Collection::tick(&mut s, 1);
    assert_eq!(s.rows().count(), 0);
}

#[test]
fn scenario_deferred_delete_wins_over_deferred_merge_same_tick() {
    let mut t = Table::new();
    t.merge(row(vec![Value::string("a"), Value::string("a")]), 1);
    t.deferred_merge(row(vec![Value::string("b"), Value::string("b")]));
    t.deferred_delete(row(vec![Value::string("a"), Value::string("a")]));
    // Deleting a tuple never present is a no-op.
    t.deferred_delete(row(vec![Value::string("c"), Value::string("c")]));
    Collection::tick(&mut t, 2);

    assert!(!t.contains(&row(vec![Value::string("a"), Value::string("a")])));
    assert!(t.contains(&row(vec![Value::string("b"), Value::string("b")])));
    assert_eq!(t.len(), 1);
}

#[test]
fn scenario_stdout_buffers_deferred_rows_until_tick() {
    let mut buf = Vec::new();
    {
        let mut out = Stdout::new(&mut buf);
        out.deferred_merge(row(vec![Value::Int32(1)]));
        out.deferred_merge(row(vec![Value::Int32(2)]));
        Collection::tick(&mut out, 1);
    }
    assert_eq!(String::from_utf8(buf).unwrap(), "(1)\n(2)\n");
}

#[test]
fn scenario_stdout_immediate_merge_flushes_synchronously() {
    let mut buf = Vec::new();
    {
        let mut out = Stdout::new(&mut buf);
        out.merge(&row(vec![Value::Int32(7)])).unwrap();
    }
    assert_eq!(String::from_utf8(buf).unwrap(), "(7)\n");
}

#[test]
fn scenario_join_on_equal_keys_produces_exact_row_multiset() {
    let left = vec![
        row(vec![Value::Int32(1), Value::string("x")]),
        row(vec![Value::Int32(1), Value::string("y")]),
        row(vec![Value::Int32(2), Value::string("z")]),
        row(vec![Value::Int32(3), Value::string("w")]),
    ];
    let right = vec![
        row(vec![Value::Int32(1), Value::Bool(true)]),
        row(vec![Value::Int32(1), Value::Bool(false)]),
        row(vec![Value::Int32(2), Value::Bool(true)]),
    ];
    let left_scan = Scan::over_collection("left", left.iter().map(|t| (t, 0)));
    let right_scan = Scan::over_collection("right", right.iter().map(|t| (t, 0)));
    let join = HashJoin::new(vec![0], vec![0]).unwrap();
    let mut out: Vec<Tuple> = join.apply(left_scan, right_scan).map(|r| r.tuple).collect();
    out.sort_by_key(|t| format!("{t}"));
    // key 1: 2 left rows * 2 right rows = 4; key 2: 1 * 1 = 1; key 3 has no
    // match on the right.
    assert_eq!(out.len(), 5);
}

#[test]
fn scenario_join_exact_eight_row_multiset_with_doubled_keys() {
    let left = vec![
        row(vec![Value::Int32(1)]),
        row(vec![Value::Int32(1)]),
        row(vec![Value::Int32(2)]),
        row(vec![Value::Int32(2)]),
    ];
    let right = vec![
        row(vec![Value::Int32(1)]),
        row(vec![Value::Int32(1)]),
        row(vec![Value::Int32(2)]),
        row(vec![Value::Int32(2)]),
    ];
    let left_scan = Scan::over_collection("left", left.iter().map(|t| (t, 0)));
    let right_scan = Scan::over_collection("right", right.iter().map(|t| (t, 0)));
    let join = HashJoin::new(vec![0], vec![0]).unwrap();
    let out: Vec<Tuple> = join.apply(left_scan, right_scan).map(|r| r.tuple).collect();
    assert_eq!(out.len(), 8);
}

#[test]
fn scenario_group_by_produces_exact_three_groups() {
    let rows = vec![
        row(vec![Value::Int32(1), Value::Int32(10)]),
        row(vec![Value::Int32(1), Value::Int32(20)]),
        row(vec![Value::Int32(2), Value::Int32(5)]),
        row(vec![Value::Int32(3), Value::Int32(1)]),
        row(vec![Value::Int32(3), Value::Int32(2)]),
        row(vec![Value::Int32(3), Value::Int32(3)]),
    ];
    let scan = Scan::over_collection("t", rows.iter().map(|t| (t, 0)));
    let gb = GroupBy::new(
        vec![0],
        vec![Box::new(|| Box::new(SumAgg::new(vec![1])) as Box<dyn fluent::ra::Agg>)],
    );
    let mut out: Vec<Tuple> = gb.apply(scan).map(|r| r.tuple).collect();
    out.sort_by_key(|t| format!("{t}"));
    assert_eq!(out.len(), 3);
    assert_eq!(out[0], row(vec![Value::Int32(1), Value::Int32(30)]));
    assert_eq!(out[1], row(vec![Value::Int32(2), Value::Int32(5)]));
    assert_eq!(out[2], row(vec![Value::Int32(3), Value::Int32(6)]));
}

#[test]
fn scenario_bool_lattice_merge_expr_is_or_over_a_relations_rows() {
    let mut a = BoolLattice::new(false);
    a.merge_expr([false, false]);
    assert!(!*a);
    a.merge_expr([false, true, true]);
    assert!(*a);
}

#[test]
fn scenario_channel_round_trips_pickled_payload() {
    let mut c = Channel::new();
    let tuple = row(vec![Value::string("peer:1"), Value::Int32(99)]);
    c.send(&tuple).unwrap();
    let outbox = c.take_outbox();
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].address, "peer:1");
}
