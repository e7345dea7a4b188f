// Copyright (c) The trapmap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `SearchStructure`: the search DAG's root, plus the DAG-rewiring half of
//! `add_segment`. The trapezoid-splitting half lives in [`crate::map`].

use crate::dag::{DagArena, DagNodeId, DagNodeKind};
use crate::errors::Error;
use crate::geometry::{Point, Segment};
use crate::map::MapUpdate;
use crate::trapezoid::{TrapezoidArena, TrapezoidId};
use std::collections::HashSet;
use std::fmt;

/// Owns the root of the search DAG. The DAG nodes themselves live in a
/// [`DagArena`] passed into every method, since [`crate::map`] mints leaves
/// into the same arena when it creates trapezoids.
#[derive(Clone, Copy, Debug)]
pub struct SearchStructure {
    root: DagNodeId,
}

impl SearchStructure {
    pub fn new(root: DagNodeId) -> Self {
        Self { root }
    }

    pub fn root(&self) -> DagNodeId {
        self.root
    }

    /// Locates the trapezoid containing `p`.
    pub fn query(&self, dag: &DagArena, p: Point) -> TrapezoidId {
        dag.traverse(self.root, p)
    }

    /// Rewires the DAG to reflect `result`, the trapezoid-level outcome of
    /// crossing `s`. `old_leaves[i]` must be the leaf that named
    /// `delta[i]` *before* [`crate::map::TrapezoidalMap::update`] ran;
    /// callers fetch it before calling that method, since the trapezoid's
    /// own back-link is still intact until retirement.
    ///
    /// Builds every new DAG node first and only issues `replace_leaf` calls
    /// once they're fully wired -- a `replace_leaf` call reassigns parent
    /// pointers immediately, so a
    /// half-built subgraph reachable through one must never be exposed to a
    /// concurrent query, and `query` here is `&self` so ordering within this
    /// single-threaded call is the only thing that matters.
    pub(crate) fn update(
        &mut self,
        dag: &mut DagArena,
        trapezoids: &TrapezoidArena,
        s: Segment,
        old_leaves: &[DagNodeId],
        result: &MapUpdate,
    ) {
        let leaf = |id: TrapezoidId| trapezoids.get(id).leaf();
        match *result {
            MapUpdate::Single { a, b, c, d } => {
                let ns = dag.insert_y(s);
                dag.set_left_child(ns, leaf(c));
                dag.set_right_child(ns, leaf(d));

                let replacement = match (a, b) {
                    (Some(a_id), Some(b_id)) => {
                        let np = dag.insert_x(s.p);
                        let nq = dag.insert_x(s.q);
                        dag.set_left_child(np, leaf(a_id));
                        dag.set_right_child(np, nq);
                        dag.set_left_child(nq, ns);
                        dag.set_right_child(nq, leaf(b_id));
                        np
                    }
                    (Some(a_id), None) => {
                        let np = dag.insert_x(s.p);
                        dag.set_left_child(np, leaf(a_id));
                        dag.set_right_child(np, ns);
                        np
                    }
                    (None, Some(b_id)) => {
                        let nq = dag.insert_x(s.q);
                        dag.set_left_child(nq, ns);
                        dag.set_right_child(nq, leaf(b_id));
                        nq
                    }
                    (None, None) => ns,
                };
                dag.replace_leaf(&mut self.root, old_leaves[0], replacement);
            }
            MapUpdate::Multi {
                first,
                last,
                ref upper_for_index,
                ref lower_for_index,
            } => {
                let k = upper_for_index.len() - 1;
                let mut ns = Vec::with_capacity(k + 1);
                for i in 0..=k {
                    let n = dag.insert_y(s);
                    dag.set_left_child(n, leaf(upper_for_index[i]));
                    dag.set_right_child(n, leaf(lower_for_index[i]));
                    ns.push(n);
                }

                let left_root = if let Some(first_id) = first {
                    let np = dag.insert_x(s.p);
                    dag.set_left_child(np, leaf(first_id));
                    dag.set_right_child(np, ns[0]);
                    np
                } else {
                    ns[0]
                };
                let right_root = if let Some(last_id) = last {
                    let nq = dag.insert_x(s.q);
                    dag.set_left_child(nq, ns[k]);
                    dag.set_right_child(nq, leaf(last_id));
                    nq
                } else {
                    ns[k]
                };

                dag.replace_leaf(&mut self.root, old_leaves[0], left_root);
                dag.replace_leaf(&mut self.root, old_leaves[k], right_root);
                for (i, &n) in ns.iter().enumerate().take(k).skip(1) {
                    dag.replace_leaf(&mut self.root, old_leaves[i], n);
                }
            }
        }
    }

    /// Checks that every trapezoid has exactly one leaf naming it and is
    /// reachable from the root, and that the DAG reaches exactly the live
    /// trapezoid set with no stragglers.
    #[doc(hidden)]
    pub fn verify(&self, dag: &DagArena, trapezoids: &TrapezoidArena) -> Result<(), Error> {
        let mut visited = HashSet::new();
        let mut reachable = HashSet::new();
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            match *dag.kind(node) {
                DagNodeKind::Leaf { trapezoid } => {
                    reachable.insert(trapezoid);
                }
                DagNodeKind::X { .. } | DagNodeKind::Y { .. } => {
                    if let Some(l) = dag.left(node) {
                        stack.push(l);
                    }
                    if let Some(r) = dag.right(node) {
                        stack.push(r);
                    }
                }
            }
        }

        if reachable.len() != trapezoids.len() {
            return Err(Error::StructuralInvariantViolated(format!(
                "DAG reaches {} distinct trapezoids but the arena holds {}",
                reachable.len(),
                trapezoids.len()
            )));
        }
        for (id, t) in trapezoids.iter() {
            if !reachable.contains(&id) {
                return Err(Error::StructuralInvariantViolated(format!(
                    "trapezoid {} is not reachable from the DAG root",
                    id
                )));
            }
            match *dag.kind(t.leaf()) {
                DagNodeKind::Leaf { trapezoid } if trapezoid == id => {}
                DagNodeKind::Leaf { .. } => {
                    return Err(Error::StructuralInvariantViolated(format!(
                        "trapezoid {}'s leaf names a different trapezoid",
                        id
                    )));
                }
                _ => {
                    return Err(Error::StructuralInvariantViolated(format!(
                        "trapezoid {}'s back-link is not a leaf node",
                        id
                    )));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for SearchStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SearchStructure(root={})", self.root)
    }
}
