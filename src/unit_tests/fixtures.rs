// Copyright (c) The trapmap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Whitebox construction helpers, bypassing [`crate::build::build`]'s crossing
//! check and RNG so tests can drive a fixed insertion order directly against
//! [`TrapezoidalMap`] and [`SearchStructure`].

use crate::dag::DagArena;
use crate::geometry::{BoundingBox, Point, Segment};
use crate::map::TrapezoidalMap;
use crate::search::SearchStructure;

pub struct Built {
    pub map: TrapezoidalMap,
    pub dag: DagArena,
    pub search: SearchStructure,
    pub bounds: BoundingBox,
}

/// Constructs a map from `segments`, inserted in the given order (no
/// shuffling), following the same seed-then-insert-one-at-a-time driver loop
/// `build` uses.
pub fn construct_in_order(segments: &[Segment]) -> Built {
    let bounds = BoundingBox::from_segments(segments, 1.0).unwrap_or(BoundingBox {
        lower_left: Point::new(-1.0, -1.0),
        lower_right: Point::new(1.0, -1.0),
        upper_left: Point::new(-1.0, 1.0),
        upper_right: Point::new(1.0, 1.0),
    });

    let mut dag = DagArena::new();
    let mut map = TrapezoidalMap::new();
    let root_trap = map.seed(&mut dag, bounds.top(), bounds.bottom(), bounds.lower_left, bounds.lower_right);
    let mut search = SearchStructure::new(map.get(root_trap).leaf());

    for &s in segments {
        let root = search.root();
        let delta = map.follow_segment(&dag, root, s);
        let old_leaves: Vec<_> = delta.iter().map(|&id| map.get(id).leaf()).collect();
        let update = map.update(&mut dag, s, &delta);
        search.update(&mut dag, map.arena(), s, &old_leaves, &update);
        map.retire(&mut dag, &delta);
    }

    Built { map, dag, search, bounds }
}
