// Copyright (c) The trapmap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structural invariants checked directly against the whitebox construction
//! helper: that construction leaves the arena and DAG consistent, that
//! traversal from a trapezoid's own interior always reaches its own leaf,
//! and that a single segment always yields four trapezoids once the
//! bounding rectangle is padded.

use super::fixtures::construct_in_order;
use crate::dag::DagNodeKind;
use crate::geometry::Point;
use pretty_assertions::assert_eq;

fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> crate::geometry::Segment {
    crate::geometry::Segment::new(Point::new(x0, y0), Point::new(x1, y1)).unwrap()
}

/// After construction, the trapezoid arena's invariants hold and the DAG
/// reaches exactly as many distinct leaves as there are trapezoids.
#[test]
fn p1_p4_invariants_hold_after_construction() {
    let built = construct_in_order(&[
        seg(1.0, 3.0, 5.0, 4.0),
        seg(3.0, 2.0, 6.0, 1.0),
        seg(0.5, 6.0, 8.0, 5.5),
    ]);
    built.map.verify().unwrap();
    built.search.verify(&built.dag, built.map.arena()).unwrap();
}

/// Traversing the DAG root with a point drawn from a trapezoid's own
/// interior always reaches that trapezoid's own leaf.
#[test]
fn p3_traversal_from_interior_point_matches_own_leaf() {
    let built = construct_in_order(&[seg(1.0, 3.0, 5.0, 4.0), seg(3.0, 2.0, 6.0, 1.0)]);

    for (id, t) in built.map.iter() {
        // The midpoint of the diagonal from leftp to rightp, nudged
        // vertically towards the trapezoid's own vertical center, lands in
        // the open interior for every non-degenerate trapezoid produced by
        // this fixture.
        let mid_x = (t.leftp.x + t.rightp.x) / 2.0;
        let top_y_at_mid = y_at(t.top, mid_x);
        let bottom_y_at_mid = y_at(t.bottom, mid_x);
        let mid_y = (top_y_at_mid + bottom_y_at_mid) / 2.0;
        let p = Point::new(mid_x, mid_y);

        let reached = built.dag.traverse(built.search.root(), p);
        assert_eq!(reached, id, "interior point of trapezoid {} routed elsewhere", id);

        match *built.dag.kind(t.leaf()) {
            DagNodeKind::Leaf { trapezoid } => assert_eq!(trapezoid, id),
            _ => panic!("trapezoid {}'s back-link is not a leaf", id),
        }
    }
}

fn y_at(s: crate::geometry::Segment, x: f64) -> f64 {
    if s.q.x == s.p.x {
        return s.p.y;
    }
    s.p.y + (s.q.y - s.p.y) * (x - s.p.x) / (s.q.x - s.p.x)
}

/// A single non-degenerate segment, with R padded by a positive margin,
/// always yields exactly four trapezoids.
#[test]
fn b2_single_segment_always_yields_four() {
    let built = construct_in_order(&[seg(2.0, 2.0, 9.0, 7.0)]);
    assert_eq!(built.map.len(), 4);
}
