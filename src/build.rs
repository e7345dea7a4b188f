// Copyright (c) The trapmap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The construction driver and the top-level [`Map`] it produces.

use crate::dag::DagArena;
use crate::errors::Error;
use crate::geometry::{properly_crosses, BoundingBox, Point, Segment};
use crate::map::TrapezoidalMap;
use crate::search::SearchStructure;
use crate::trapezoid::{Trapezoid, TrapezoidId};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fmt;
use tracing::{debug, info, instrument};

/// Options accepted by [`build`].
#[derive(Clone, Copy, Debug)]
pub struct BuildOptions {
    /// Seeds the shuffle that randomizes insertion order. `None` draws a
    /// fresh seed from the OS each call, so two `build`s of the same segment
    /// set are not reproducible unless a seed is supplied. Reshuffling and
    /// rebuilding is expected to reproduce a congruent partition of the
    /// plane, not an identical one.
    pub rng_seed: Option<u64>,
    /// How far the initial bounding rectangle `R` extends past the extreme
    /// segment coordinates on every side.
    pub margin: f64,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            rng_seed: None,
            margin: 1.0,
        }
    }
}

/// A built trapezoidal map plus its search structure: the crate's sole entry
/// point for locating points once construction has finished.
#[derive(Clone, Debug)]
pub struct Map {
    trapezoids: TrapezoidalMap,
    dag: DagArena,
    search: SearchStructure,
    bounds: BoundingBox,
}

impl Map {
    /// Locates the trapezoid containing `p`. Returns `None` for a point
    /// outside the map's bounding box; `query` never errors for points
    /// inside it.
    pub fn query(&self, p: Point) -> Option<TrapezoidId> {
        if !self.contains(p) {
            return None;
        }
        Some(self.search.query(&self.dag, p))
    }

    /// Looks up a trapezoid by id. Panics if `id` has been retired, which
    /// cannot happen for an id returned by [`Self::query`] on a `Map` that
    /// hasn't been mutated further (there is no mutation after `build`).
    pub fn trapezoid(&self, id: TrapezoidId) -> &Trapezoid {
        self.trapezoids.get(id)
    }

    /// The number of live trapezoids.
    pub fn len(&self) -> usize {
        self.trapezoids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trapezoids.is_empty()
    }

    /// Iterates over every live trapezoid, in arena order. Used by brute-force
    /// comparisons in tests; `query` should be preferred for real lookups.
    pub fn iter(&self) -> impl Iterator<Item = (TrapezoidId, &Trapezoid)> {
        self.trapezoids.iter()
    }

    /// The bounding rectangle `R` computed at construction time.
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    fn contains(&self, p: Point) -> bool {
        p.x > self.bounds.lower_left.x
            && p.x < self.bounds.lower_right.x
            && p.y > self.bounds.lower_left.y
            && p.y < self.bounds.upper_left.y
    }

    /// Re-checks every structural invariant from scratch: trapezoid shape,
    /// neighbor symmetry, and the leaf/trapezoid bijection between the two
    /// structures. Exercised after every `add_segment` in debug builds;
    /// exposed so integration tests and fuzzing can call it directly too.
    #[doc(hidden)]
    pub fn verify(&self) -> Result<(), Error> {
        self.trapezoids.verify()?;
        self.search.verify(&self.dag, self.trapezoids.arena())
    }

    #[instrument(level = "debug", skip(self))]
    fn add_segment(&mut self, s: Segment) {
        let root = self.search.root();
        let delta = self.trapezoids.follow_segment(&self.dag, root, s);
        debug!(crossed = delta.len(), "add_segment crossing trapezoids");
        let old_leaves: Vec<_> = delta.iter().map(|&id| self.trapezoids.get(id).leaf()).collect();
        let update = self.trapezoids.update(&mut self.dag, s, &delta);
        self.search
            .update(&mut self.dag, self.trapezoids.arena(), s, &old_leaves, &update);
        self.trapezoids.retire(&mut self.dag, &delta);

        #[cfg(debug_assertions)]
        self.verify().expect("structural invariant violated after add_segment");
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.trapezoids)?;
        write!(f, "{}", self.search)
    }
}

/// Builds a trapezoidal map and its search structure from `segments`. Fails
/// if two segments properly cross -- detection is best-effort, a single
/// pairwise pass, not a full intersection sweep.
#[instrument(level = "info", skip(segments))]
pub fn build(segments: Vec<Segment>, options: BuildOptions) -> Result<Map, Error> {
    for i in 0..segments.len() {
        for j in (i + 1)..segments.len() {
            if properly_crosses(segments[i], segments[j]) {
                return Err(Error::CrossingSegments(segments[i], segments[j]));
            }
        }
    }

    let bounds = BoundingBox::from_segments(&segments, options.margin).unwrap_or_else(|| BoundingBox {
        lower_left: Point::new(-options.margin, -options.margin),
        lower_right: Point::new(options.margin, -options.margin),
        upper_left: Point::new(-options.margin, options.margin),
        upper_right: Point::new(options.margin, options.margin),
    });

    let mut dag = DagArena::new();
    let mut trapezoids = TrapezoidalMap::new();
    let root_trap = trapezoids.seed(
        &mut dag,
        bounds.top(),
        bounds.bottom(),
        bounds.lower_left,
        bounds.lower_right,
    );
    let root_leaf = trapezoids.get(root_trap).leaf();
    let search = SearchStructure::new(root_leaf);

    let mut map = Map {
        trapezoids,
        dag,
        search,
        bounds,
    };

    let mut order = segments;
    let mut rng = match options.rng_seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    order.shuffle(&mut rng);

    info!(segments = order.len(), "building trapezoidal map");
    for s in order {
        map.add_segment(s);
    }

    Ok(map)
}
