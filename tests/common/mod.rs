// Copyright (c) The trapmap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for the scenario and fuzz integration tests.

use trapmap::{Point, Segment, Trapezoid};

pub fn seg(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment {
    Segment::new(Point::new(x0, y0), Point::new(x1, y1)).unwrap()
}

/// A five-segment star fixture: five segments meeting at `(2, 4)`, forming a
/// closed region.
pub fn star_fixture() -> Vec<Segment> {
    vec![
        seg(10.0, 8.0, 2.0, 4.0),
        seg(2.0, 4.0, 6.0, 2.0),
        seg(6.0, 2.0, 20.0, 4.0),
        seg(20.0, 4.0, 12.0, 10.0),
        seg(2.0, 4.0, 16.0, 6.0),
    ]
}

/// A bit-exact comparison key for a trapezoid's four defining fields, used to
/// check order-independent construction by comparing the *set* of
/// `(top, bottom, leftp, rightp)` tuples across two differently-shuffled
/// builds of the same segment set. Bit-for-bit comparison is appropriate here
/// since no arithmetic is performed on these fields beyond what `Segment`
/// normalization already did once, at input time.
pub type TrapezoidKey = [u64; 12];

pub fn trapezoid_key(t: &Trapezoid) -> TrapezoidKey {
    [
        t.top.p.x.to_bits(),
        t.top.p.y.to_bits(),
        t.top.q.x.to_bits(),
        t.top.q.y.to_bits(),
        t.bottom.p.x.to_bits(),
        t.bottom.p.y.to_bits(),
        t.bottom.q.x.to_bits(),
        t.bottom.q.y.to_bits(),
        t.leftp.x.to_bits(),
        t.leftp.y.to_bits(),
        t.rightp.x.to_bits(),
        t.rightp.y.to_bits(),
    ]
}
