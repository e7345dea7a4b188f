// Copyright (c) The trapmap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `TrapezoidalMap`: owns the live trapezoid set and performs the geometric
//! half of `add_segment` -- locating which trapezoids a new segment crosses
//! and splitting/merging them. The DAG half lives in [`crate::search`].

use crate::dag::DagArena;
use crate::errors::Error;
use crate::geometry::{lies_above, lies_left_of, Point, Segment};
use crate::trapezoid::{Trapezoid, TrapezoidArena, TrapezoidId};
use itertools::Itertools;
use std::fmt;

/// How far a query point is nudged off an x-node's test point to break the
/// shared-endpoint tie in [`TrapezoidalMap::follow_segment`]. Chosen small
/// enough not to cross into a neighboring trapezoid for any segment set this
/// crate expects to see; see DESIGN.md.
const EPSILON: f64 = 1e-7;

/// The outcome of [`TrapezoidalMap::update`]: the new trapezoids it created,
/// shaped so [`crate::search::SearchStructure::update`] can rewire the DAG
/// without recomputing any geometry.
#[derive(Clone, Debug)]
pub(crate) enum MapUpdate {
    /// The segment crossed a single trapezoid.
    Single {
        a: Option<TrapezoidId>,
        b: Option<TrapezoidId>,
        c: TrapezoidId,
        d: TrapezoidId,
    },
    /// The segment crossed `upper_for_index.len()` trapezoids. `first`/`last`
    /// are the end slivers (present only when the segment's endpoint didn't
    /// land exactly on the crossed trapezoid's own generator point).
    /// `upper_for_index[i]`/`lower_for_index[i]` name the merged trapezoid
    /// that the i-th crossed trapezoid's upper/lower half ended up in --
    /// several consecutive `i` can share the same id, which is exactly the
    /// sharing `SearchStructure::update` needs to reproduce in the DAG.
    Multi {
        first: Option<TrapezoidId>,
        last: Option<TrapezoidId>,
        upper_for_index: Vec<TrapezoidId>,
        lower_for_index: Vec<TrapezoidId>,
    },
}

/// Owns the trapezoid arena and the operations that keep it consistent with
/// a growing segment set.
#[derive(Clone, Debug, Default)]
pub struct TrapezoidalMap {
    trapezoids: TrapezoidArena,
}

impl TrapezoidalMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: TrapezoidId) -> &Trapezoid {
        self.trapezoids.get(id)
    }

    pub fn len(&self) -> usize {
        self.trapezoids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trapezoids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TrapezoidId, &Trapezoid)> {
        self.trapezoids.iter()
    }

    /// Exposes the underlying arena, for [`crate::search::SearchStructure`]
    /// to look up leaf back-links without `TrapezoidalMap` having to proxy
    /// every accessor.
    pub(crate) fn arena(&self) -> &TrapezoidArena {
        &self.trapezoids
    }

    /// Creates a trapezoid and its matching DAG leaf together, and wires the
    /// back-link, so no trapezoid is ever observable without a leaf.
    pub(crate) fn new_trapezoid(
        &mut self,
        dag: &mut DagArena,
        top: Segment,
        bottom: Segment,
        leftp: Point,
        rightp: Point,
    ) -> TrapezoidId {
        let id = self.trapezoids.insert(top, bottom, leftp, rightp);
        let leaf = dag.insert_leaf(id);
        self.trapezoids.set_leaf(id, leaf);
        id
    }

    /// Seeds the map with the sole initial trapezoid `R`, returning its id.
    pub(crate) fn seed(
        &mut self,
        dag: &mut DagArena,
        top: Segment,
        bottom: Segment,
        leftp: Point,
        rightp: Point,
    ) -> TrapezoidId {
        self.new_trapezoid(dag, top, bottom, leftp, rightp)
    }

    /// Descends the search DAG from `root` to the trapezoid containing `s.p`,
    /// nudging the query point off the first x-node it ties exactly -- the
    /// case where `s.p` coincides with an earlier segment's endpoint.
    fn locate_start(&self, dag: &DagArena, root: crate::dag::DagNodeId, s: Segment) -> TrapezoidId {
        use crate::dag::DagNodeKind;

        let mut current = root;
        let mut query = s.p;
        let mut nudged = false;
        loop {
            match *dag.kind(current) {
                DagNodeKind::Leaf { trapezoid } => return trapezoid,
                DagNodeKind::X { at } => {
                    if !nudged && query == at {
                        // s.p coincides with an earlier segment's endpoint.
                        // Nudge along s towards q so the descent can tell
                        // which side of `at` the rest of s actually falls on.
                        query = nudge_towards(s, EPSILON);
                        nudged = true;
                    }
                    current = if lies_left_of(query, at) {
                        dag.left(current)
                    } else {
                        dag.right(current)
                    }
                    .expect("x-node missing a child");
                }
                DagNodeKind::Y { segment } => {
                    current = if lies_above(query, segment) {
                        dag.left(current)
                    } else {
                        dag.right(current)
                    }
                    .expect("y-node missing a child");
                }
            }
        }
    }

    /// Walks the trapezoid chain crossed by `s`, starting from the trapezoid
    /// containing `s.p`. The returned list always has at least one element.
    pub(crate) fn follow_segment(
        &self,
        dag: &DagArena,
        root: crate::dag::DagNodeId,
        s: Segment,
    ) -> Vec<TrapezoidId> {
        let mut current = self.locate_start(dag, root, s);
        let mut delta = vec![current];
        loop {
            let t = self.trapezoids.get(current);
            if !lies_left_of(t.rightp, s.q) {
                break;
            }
            let next = if lies_above(t.rightp, s) {
                t.lrn().expect("follow_segment: missing lower-right neighbor")
            } else {
                t.urn().expect("follow_segment: missing upper-right neighbor")
            };
            delta.push(next);
            current = next;
        }
        delta
    }

    /// Splits/merges the trapezoids named by `delta` around `s`, returning
    /// the new trapezoids created. Does not retire `delta`'s trapezoids or
    /// touch the search DAG's internal nodes -- see [`Self::retire`] and
    /// [`crate::search::SearchStructure::update`] for the remaining steps of
    /// the mandatory ordering a single `add_segment` call follows.
    pub(crate) fn update(&mut self, dag: &mut DagArena, s: Segment, delta: &[TrapezoidId]) -> MapUpdate {
        if delta.len() == 1 {
            self.update_single(dag, s, delta[0])
        } else {
            self.update_multi(dag, s, delta)
        }
    }

    fn update_single(&mut self, dag: &mut DagArena, s: Segment, old_id: TrapezoidId) -> MapUpdate {
        let old = *self.trapezoids.get(old_id);

        let a = if old.leftp != s.p {
            Some(self.new_trapezoid(dag, old.top, old.bottom, old.leftp, s.p))
        } else {
            None
        };
        let b = if old.rightp != s.q {
            Some(self.new_trapezoid(dag, old.top, old.bottom, s.q, old.rightp))
        } else {
            None
        };
        let c = self.new_trapezoid(dag, old.top, s, s.p, s.q);
        let d = self.new_trapezoid(dag, s, old.bottom, s.p, s.q);

        if let Some(a_id) = a {
            self.trapezoids.set_neighbors(a_id, old.uln(), old.lln(), Some(c), Some(d));
        }
        if let Some(b_id) = b {
            self.trapezoids.set_neighbors(b_id, Some(c), Some(d), old.urn(), old.lrn());
        }
        self.trapezoids
            .set_neighbors(c, a.or(old.uln()), None, b.or(old.urn()), None);
        self.trapezoids
            .set_neighbors(d, None, a.or(old.lln()), None, b.or(old.lrn()));

        MapUpdate::Single { a, b, c, d }
    }

    /// The multi-trapezoid case: split every crossed trapezoid along `s`,
    /// merge consecutive upper pieces that share a top and consecutive lower
    /// pieces that share a bottom, and create end slivers for any partial
    /// overhang at `s.p`/`s.q`.
    ///
    /// The neighbor-stitching rule below (see DESIGN.md for its derivation):
    /// within a merged run, `uln`/`urn` (for an upper run) or `lln`/`lrn` (for
    /// a lower run) carry
    /// the *external* neighbor of the run's first/last original piece only at
    /// the global ends of `delta`; everywhere else that slot is empty by
    /// construction (a run boundary is, by definition, a point where the
    /// shared side changes, so the old piece's matching slot there was
    /// already empty) and the real adjacency is the chain link to the
    /// neighboring run, carried in the *other* pair of slots (`lln`/`lrn` for
    /// an upper run, `uln`/`urn` for a lower run).
    fn update_multi(&mut self, dag: &mut DagArena, s: Segment, delta: &[TrapezoidId]) -> MapUpdate {
        let k = delta.len() - 1;
        let snapshots: Vec<Trapezoid> = delta.iter().map(|&id| *self.trapezoids.get(id)).collect();
        let d0 = snapshots[0];
        let dk = snapshots[k];

        let first = if d0.leftp != s.p {
            Some(self.new_trapezoid(dag, d0.top, d0.bottom, d0.leftp, s.p))
        } else {
            None
        };
        let last = if dk.rightp != s.q {
            Some(self.new_trapezoid(dag, dk.top, dk.bottom, s.q, dk.rightp))
        } else {
            None
        };

        let upper_runs = runs_by(&snapshots, |t| t.top);
        let lower_runs = runs_by(&snapshots, |t| t.bottom);

        let mut upper_ids = Vec::with_capacity(upper_runs.len());
        for &(a, b) in &upper_runs {
            let leftp = if a == 0 { s.p } else { snapshots[a].leftp };
            let rightp = if b == k { s.q } else { snapshots[b].rightp };
            upper_ids.push(self.new_trapezoid(dag, snapshots[a].top, s, leftp, rightp));
        }
        let mut lower_ids = Vec::with_capacity(lower_runs.len());
        for &(a, b) in &lower_runs {
            let leftp = if a == 0 { s.p } else { snapshots[a].leftp };
            let rightp = if b == k { s.q } else { snapshots[b].rightp };
            lower_ids.push(self.new_trapezoid(dag, s, snapshots[a].bottom, leftp, rightp));
        }

        for (run_idx, &(a, b)) in upper_runs.iter().enumerate() {
            let uln = if a == 0 { first.or_else(|| d0.uln()) } else { None };
            let lln = if run_idx > 0 { Some(upper_ids[run_idx - 1]) } else { None };
            let urn = if b == k { last.or_else(|| dk.urn()) } else { None };
            let lrn = if run_idx + 1 < upper_ids.len() {
                Some(upper_ids[run_idx + 1])
            } else {
                None
            };
            self.trapezoids.set_neighbors(upper_ids[run_idx], uln, lln, urn, lrn);
        }
        for (run_idx, &(a, b)) in lower_runs.iter().enumerate() {
            let uln = if run_idx > 0 { Some(lower_ids[run_idx - 1]) } else { None };
            let lln = if a == 0 { first.or_else(|| d0.lln()) } else { None };
            let urn = if run_idx + 1 < lower_ids.len() {
                Some(lower_ids[run_idx + 1])
            } else {
                None
            };
            let lrn = if b == k { last.or_else(|| dk.lrn()) } else { None };
            self.trapezoids.set_neighbors(lower_ids[run_idx], uln, lln, urn, lrn);
        }

        if let Some(first_id) = first {
            self.trapezoids
                .set_neighbors(first_id, d0.uln(), d0.lln(), Some(upper_ids[0]), Some(lower_ids[0]));
        }
        if let Some(last_id) = last {
            let last_upper = *upper_ids.last().unwrap();
            let last_lower = *lower_ids.last().unwrap();
            self.trapezoids
                .set_neighbors(last_id, Some(last_upper), Some(last_lower), dk.urn(), dk.lrn());
        }

        let upper_for_index = expand_runs(&upper_runs, &upper_ids, k);
        let lower_for_index = expand_runs(&lower_runs, &lower_ids, k);

        MapUpdate::Multi {
            first,
            last,
            upper_for_index,
            lower_for_index,
        }
    }

    /// Retires every trapezoid named by `delta`, together with its DAG leaf.
    /// Must only be called after [`crate::search::SearchStructure::update`]
    /// has rewired every reference to those leaves away.
    pub(crate) fn retire(&mut self, dag: &mut DagArena, delta: &[TrapezoidId]) {
        for &id in delta {
            let leaf = self.trapezoids.get(id).leaf();
            self.trapezoids.retire(id);
            dag.retire(leaf);
        }
    }

    /// Checks that every live trapezoid's generators are correctly ordered
    /// and that every neighbor slot is reciprocated.
    #[doc(hidden)]
    pub fn verify(&self) -> Result<(), Error> {
        for (id, t) in self.trapezoids.iter() {
            if t.leftp.x > t.rightp.x {
                return Err(Error::StructuralInvariantViolated(format!(
                    "trapezoid {} has leftp.x > rightp.x",
                    id
                )));
            }
            self.check_symmetric(id, t.uln(), |n| n.urn())?;
            self.check_symmetric(id, t.lln(), |n| n.lrn())?;
            self.check_symmetric(id, t.urn(), |n| n.uln())?;
            self.check_symmetric(id, t.lrn(), |n| n.lln())?;
        }
        Ok(())
    }

    fn check_symmetric(
        &self,
        id: TrapezoidId,
        slot: Option<TrapezoidId>,
        back: impl Fn(&Trapezoid) -> Option<TrapezoidId>,
    ) -> Result<(), Error> {
        if let Some(n) = slot {
            if back(self.trapezoids.get(n)) != Some(id) {
                return Err(Error::StructuralInvariantViolated(format!(
                    "neighbor slot of trapezoid {} pointing at {} is not reciprocated",
                    id, n
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for TrapezoidalMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TrapezoidalMap ({} trapezoids)", self.len())?;
        for (id, t) in self.trapezoids.iter() {
            writeln!(f, "  #{}: {}", id, t)?;
        }
        Ok(())
    }
}

/// Nudges `s.p` a small distance towards `s.q` along the segment's own
/// direction, used only to break the shared-endpoint tie in
/// [`TrapezoidalMap::locate_start`].
fn nudge_towards(s: Segment, epsilon: f64) -> Point {
    let dx = s.q.x - s.p.x;
    let dy = s.q.y - s.p.y;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return s.p;
    }
    Point::new(s.p.x + epsilon * dx / len, s.p.y + epsilon * dy / len)
}

/// Groups `snapshots` into maximal runs of consecutive equal `key`, returning
/// each run as an inclusive `(start, end)` index pair.
fn runs_by(snapshots: &[Trapezoid], key: impl Fn(&Trapezoid) -> Segment) -> Vec<(usize, usize)> {
    snapshots
        .iter()
        .enumerate()
        .group_by(|(_, t)| key(t))
        .into_iter()
        .map(|(_, group)| {
            let indices: Vec<usize> = group.map(|(i, _)| i).collect();
            (indices[0], *indices.last().unwrap())
        })
        .collect()
}

/// Expands a run list back into a per-original-index lookup, so position `i`
/// maps to the id of the merged trapezoid its piece ended up in.
fn expand_runs(runs: &[(usize, usize)], ids: &[TrapezoidId], k: usize) -> Vec<TrapezoidId> {
    let mut out = vec![ids[0]; k + 1];
    for (run_idx, &(a, b)) in runs.iter().enumerate() {
        for slot in out.iter_mut().take(b + 1).skip(a) {
            *slot = ids[run_idx];
        }
    }
    out
}
