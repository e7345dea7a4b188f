// Copyright (c) The trapmap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The trapezoid record and the arena that owns the live trapezoid set.

use crate::arena::{define_index, Arena};
use crate::dag::DagNodeId;
use crate::geometry::{Point, Segment};
use std::fmt;

define_index! {
    /// A handle into a [`TrapezoidArena`]. Stable across retirement: once
    /// issued, an id either names the same trapezoid forever or has been
    /// tombstoned (see [`Arena::retire`]).
    pub struct TrapezoidId;
}

/// The four-way neighbor slots of a trapezoid. A `None` slot means the
/// corresponding vertical side touches only the trapezoid's own generator
/// point -- i.e. that generator is an endpoint of `top` or `bottom` -- and has
/// no neighboring trapezoid across it.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Neighbors {
    pub uln: Option<TrapezoidId>,
    pub lln: Option<TrapezoidId>,
    pub urn: Option<TrapezoidId>,
    pub lrn: Option<TrapezoidId>,
}

/// A single trapezoid of the map: a region bounded above and below by two
/// non-vertical segments and, on the left and right, by the vertical
/// extensions of two generator points.
///
/// Once constructed, `top`/`bottom`/`leftp`/`rightp` never change -- a new
/// boundary always means a new trapezoid. Only the neighbor slots and the
/// back-link to this trapezoid's leaf are ever mutated in place, and only
/// through [`TrapezoidArena::set_neighbors`] and [`TrapezoidArena::set_leaf`]
/// so neighbor symmetry can't be broken by a stray one-sided write.
#[derive(Clone, Copy, Debug)]
pub struct Trapezoid {
    pub top: Segment,
    pub bottom: Segment,
    pub leftp: Point,
    pub rightp: Point,
    neighbors: Neighbors,
    leaf: Option<DagNodeId>,
}

impl Trapezoid {
    pub fn uln(&self) -> Option<TrapezoidId> {
        self.neighbors.uln
    }
    pub fn lln(&self) -> Option<TrapezoidId> {
        self.neighbors.lln
    }
    pub fn urn(&self) -> Option<TrapezoidId> {
        self.neighbors.urn
    }
    pub fn lrn(&self) -> Option<TrapezoidId> {
        self.neighbors.lrn
    }

    /// The leaf of the search DAG that names this trapezoid.
    ///
    /// Panics if called before [`TrapezoidArena::set_leaf`] has run for this
    /// trapezoid; every trapezoid has a leaf by the time `add_segment`
    /// returns, but briefly lacks one between [`TrapezoidArena::insert`] and
    /// the matching leaf's creation.
    pub fn leaf(&self) -> DagNodeId {
        self.leaf.expect("trapezoid has no leaf yet")
    }
}

impl fmt::Display for Trapezoid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "trapezoid[{}, {}] top={} bottom={}",
            self.leftp, self.rightp, self.top, self.bottom
        )
    }
}

/// Owns the live set of trapezoids. Every mutation that could break neighbor
/// symmetry goes through this type rather than through `Trapezoid` directly,
/// since fixing up a neighbor's back-pointer requires mutable access to a
/// second arena slot.
#[derive(Clone, Debug, Default)]
pub struct TrapezoidArena {
    arena: Arena<Trapezoid, TrapezoidId>,
}

impl TrapezoidArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new trapezoid with no neighbors and no leaf yet. Callers
    /// always immediately create the matching leaf and call [`Self::set_leaf`]
    /// -- see [`crate::map::TrapezoidalMap::new_trapezoid`], the one place
    /// both halves of the pair are minted together.
    pub fn insert(&mut self, top: Segment, bottom: Segment, leftp: Point, rightp: Point) -> TrapezoidId {
        self.arena.insert(Trapezoid {
            top,
            bottom,
            leftp,
            rightp,
            neighbors: Neighbors::default(),
            leaf: None,
        })
    }

    pub fn get(&self, id: TrapezoidId) -> &Trapezoid {
        self.arena.get(id)
    }

    pub fn is_live(&self, id: TrapezoidId) -> bool {
        self.arena.is_live(id)
    }

    pub fn retire(&mut self, id: TrapezoidId) -> Trapezoid {
        self.arena.retire(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TrapezoidId, &Trapezoid)> {
        self.arena.iter()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Points `id`'s leaf back-link at `leaf`. Used once, right after
    /// `insert`, by the code that just built the matching leaf.
    pub fn set_leaf(&mut self, id: TrapezoidId, leaf: DagNodeId) {
        self.arena.get_mut(id).leaf = Some(leaf);
    }

    /// Sets the four neighbor slots of `id`, and symmetrically rewrites the
    /// matching slot of each non-`None` neighbor so symmetry holds
    /// immediately: `id.urn = Some(s)` implies `s.uln = Some(id)`, and so on
    /// for the other three pairs.
    pub fn set_neighbors(
        &mut self,
        id: TrapezoidId,
        uln: Option<TrapezoidId>,
        lln: Option<TrapezoidId>,
        urn: Option<TrapezoidId>,
        lrn: Option<TrapezoidId>,
    ) {
        self.arena.get_mut(id).neighbors = Neighbors { uln, lln, urn, lrn };
        if let Some(n) = uln {
            self.arena.get_mut(n).neighbors.urn = Some(id);
        }
        if let Some(n) = lln {
            self.arena.get_mut(n).neighbors.lrn = Some(id);
        }
        if let Some(n) = urn {
            self.arena.get_mut(n).neighbors.uln = Some(id);
        }
        if let Some(n) = lrn {
            self.arena.get_mut(n).neighbors.lln = Some(id);
        }
    }
}
