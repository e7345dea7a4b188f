// Copyright (c) The trapmap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random fuzzing of `build`/`query` against a brute-force linear scan,
//! behind the `proptest1` feature, matching this crate's convention of
//! gating property-based suites behind an opt-in feature.

#![cfg(feature = "proptest1")]

mod common;

use common::seg;
use proptest::collection::vec;
use proptest::prelude::*;
use trapmap::geometry::lies_above;
use trapmap::{build, BuildOptions, Point, Segment, Trapezoid, TrapezoidId};

/// Segments confined to their own disjoint x-band never cross, however their
/// y-coordinates are chosen -- this is how the strategy below builds a
/// random segment set with guaranteed-disjoint interiors without needing a
/// full intersection sweep to filter the candidates out.
fn disjoint_band_segments(max_n: usize) -> impl Strategy<Value = Vec<Segment>> {
    vec((0.0f64..8.0, 0.0f64..8.0, 0.0f64..1.0, 0.0f64..1.0), 1..max_n).prop_map(|bands| {
        bands
            .into_iter()
            .enumerate()
            .map(|(i, (y0, y1, jitter_lo, jitter_hi))| {
                let band_x0 = i as f64 * 10.0;
                let x0 = band_x0 + 1.0 + jitter_lo * 3.0;
                let x1 = band_x0 + 5.0 + jitter_hi * 3.0;
                seg(x0, y0, x1.max(x0 + 0.5), y1)
            })
            .collect()
    })
}

/// Whether `p` lies in the open interior of `t`: strictly within its x-range,
/// strictly above its bottom, strictly below its top.
fn contains_open(t: &Trapezoid, p: Point) -> bool {
    p.x > t.leftp.x && p.x < t.rightp.x && lies_above(p, t.bottom) && !lies_above(p, t.top) && p.y != t.top.p.y
}

/// Returns the unique trapezoid whose open interior contains `p`, found by a
/// plain linear scan over every live trapezoid -- the reference the DAG's
/// `O(log n)` descent is checked against.
fn brute_force_locate<'a>(trapezoids: impl Iterator<Item = (TrapezoidId, &'a Trapezoid)>, p: Point) -> Option<TrapezoidId> {
    let mut found = None;
    for (id, t) in trapezoids {
        if contains_open(t, p) {
            assert!(found.is_none(), "point {:?} matched more than one trapezoid's interior", p);
            found = Some(id);
        }
    }
    found
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_disjoint_segments_satisfy_invariants_and_match_brute_force(
        segments in disjoint_band_segments(40),
        seed in any::<u64>(),
        query_points in vec((0.0f64..420.0, -2.0f64..10.0), 1..200),
    ) {
        let map = build(segments, BuildOptions { rng_seed: Some(seed), margin: 1.0 }).unwrap();
        map.verify().unwrap();

        for (x, y) in query_points {
            let p = Point::new(x, y);
            let expected = brute_force_locate(map.iter(), p);
            let actual = map.query(p);
            if expected.is_some() {
                prop_assert!(actual.is_some(), "point {:?} should be inside the map", p);
                prop_assert_eq!(actual, expected, "query and brute-force located different trapezoids for {:?}", p);
            }
            // When the brute-force scan is inconclusive (point outside R, or
            // exactly on a boundary), `query` is still allowed to return a
            // tie-broken answer -- agreement is only guaranteed for points
            // strictly inside R off of every input segment.
        }
    }
}
