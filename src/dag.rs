// Copyright (c) The trapmap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The search DAG: x-nodes, y-nodes, and leaves, plus the arena that owns them.

use crate::arena::{define_index, Arena};
use crate::geometry::{lies_above, lies_left_of, Point, Segment};
use crate::trapezoid::TrapezoidId;
use smallvec::SmallVec;

define_index! {
    /// A handle into a [`DagArena`].
    pub struct DagNodeId;
}

/// The three node kinds of the search DAG.
#[derive(Clone, Copy, Debug)]
pub enum DagNodeKind {
    /// Tests the query point's x-coordinate against `at`.
    X { at: Point },
    /// Tests whether the query point lies above `segment`.
    Y { segment: Segment },
    /// Names the unique trapezoid this leaf stands for.
    Leaf { trapezoid: TrapezoidId },
}

/// A node of the search DAG. Internal nodes (`X`/`Y`) always have both
/// children once fully wired; a node under construction may briefly have
/// `None` children between `insert_x`/`insert_y` and the matching
/// `set_left_child`/`set_right_child` calls. Leaves never get children.
///
/// `parents` is a multiset rather than a single back-pointer because a leaf
/// -- or, after a multi-trapezoid update, a y-node -- can legitimately be
/// shared by several parents.
#[derive(Clone, Debug)]
pub struct DagNode {
    kind: DagNodeKind,
    left: Option<DagNodeId>,
    right: Option<DagNodeId>,
    parents: SmallVec<[DagNodeId; 4]>,
}

impl DagNode {
    pub fn kind(&self) -> &DagNodeKind {
        &self.kind
    }

    pub fn left(&self) -> Option<DagNodeId> {
        self.left
    }

    pub fn right(&self) -> Option<DagNodeId> {
        self.right
    }

    pub fn parents(&self) -> &[DagNodeId] {
        &self.parents
    }
}

/// Owns every node of the search DAG. The DAG's root is tracked by the caller
/// ([`crate::search::SearchStructure`]), not here, since replacing the root
/// itself is a valid outcome of [`DagArena::replace_leaf`].
#[derive(Clone, Debug, Default)]
pub struct DagArena {
    arena: Arena<DagNode, DagNodeId>,
}

impl DagArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_leaf(&mut self, trapezoid: TrapezoidId) -> DagNodeId {
        self.arena.insert(DagNode {
            kind: DagNodeKind::Leaf { trapezoid },
            left: None,
            right: None,
            parents: SmallVec::new(),
        })
    }

    pub fn insert_x(&mut self, at: Point) -> DagNodeId {
        self.arena.insert(DagNode {
            kind: DagNodeKind::X { at },
            left: None,
            right: None,
            parents: SmallVec::new(),
        })
    }

    pub fn insert_y(&mut self, segment: Segment) -> DagNodeId {
        self.arena.insert(DagNode {
            kind: DagNodeKind::Y { segment },
            left: None,
            right: None,
            parents: SmallVec::new(),
        })
    }

    /// Sets `parent`'s left child to `child` and registers `parent` into
    /// `child`'s parent multiset.
    pub fn set_left_child(&mut self, parent: DagNodeId, child: DagNodeId) {
        self.arena.get_mut(parent).left = Some(child);
        self.arena.get_mut(child).parents.push(parent);
    }

    /// Sets `parent`'s right child to `child` and registers `parent` into
    /// `child`'s parent multiset.
    pub fn set_right_child(&mut self, parent: DagNodeId, child: DagNodeId) {
        self.arena.get_mut(parent).right = Some(child);
        self.arena.get_mut(child).parents.push(parent);
    }

    /// Rewires every parent of `old` so it points at `new_root` instead,
    /// visiting each parent exactly once regardless of multiplicity. If `old`
    /// is currently the DAG root (`*root == old`), reassigns `*root` instead.
    ///
    /// `old` itself is left untouched (its kind/children/parents still read
    /// as before) -- retiring it is the caller's job, once every replacement
    /// for this `add_segment` call has been wired.
    pub fn replace_leaf(&mut self, root: &mut DagNodeId, old: DagNodeId, new_root: DagNodeId) {
        if *root == old {
            *root = new_root;
            return;
        }
        let parents: SmallVec<[DagNodeId; 4]> = self.arena.get(old).parents.clone();
        for parent in parents {
            let node = self.arena.get_mut(parent);
            if node.left == Some(old) {
                node.left = Some(new_root);
            }
            if node.right == Some(old) {
                node.right = Some(new_root);
            }
            self.arena.get_mut(new_root).parents.push(parent);
        }
    }

    pub fn kind(&self, id: DagNodeId) -> &DagNodeKind {
        self.arena.get(id).kind()
    }

    pub fn left(&self, id: DagNodeId) -> Option<DagNodeId> {
        self.arena.get(id).left()
    }

    pub fn right(&self, id: DagNodeId) -> Option<DagNodeId> {
        self.arena.get(id).right()
    }

    pub fn parents(&self, id: DagNodeId) -> &[DagNodeId] {
        self.arena.get(id).parents()
    }

    pub fn retire(&mut self, id: DagNodeId) -> DagNode {
        self.arena.retire(id)
    }

    pub fn is_live(&self, id: DagNodeId) -> bool {
        self.arena.is_live(id)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Descends from `start` according to the node-kind rules below,
    /// returning the trapezoid named by the leaf reached.
    ///
    /// Tie-breaks: a query point with `point.x == at` routes right (strict
    /// less-than routes left); a point exactly on a y-node's segment is
    /// classified as below (routes right), matching [`lies_above`]'s
    /// on-segment-is-not-above convention.
    pub fn traverse(&self, start: DagNodeId, point: Point) -> TrapezoidId {
        let mut current = start;
        loop {
            match *self.kind(current) {
                DagNodeKind::Leaf { trapezoid } => return trapezoid,
                DagNodeKind::X { at } => {
                    current = if lies_left_of(point, at) {
                        self.left(current)
                    } else {
                        self.right(current)
                    }
                    .expect("x-node missing a child");
                }
                DagNodeKind::Y { segment } => {
                    current = if lies_above(point, segment) {
                        self.left(current)
                    } else {
                        self.right(current)
                    }
                    .expect("y-node missing a child");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArenaIndex;

    fn trap_id(x: usize) -> TrapezoidId {
        ArenaIndex::from_usize(x)
    }

    #[test]
    fn traverse_single_leaf() {
        let mut dag = DagArena::new();
        let leaf = dag.insert_leaf(trap_id(0));
        assert_eq!(dag.traverse(leaf, Point::new(0.0, 0.0)), trap_id(0));
    }

    #[test]
    fn traverse_x_node_routes_by_x() {
        let mut dag = DagArena::new();
        let left_leaf = dag.insert_leaf(trap_id(0));
        let right_leaf = dag.insert_leaf(trap_id(1));
        let x = dag.insert_x(Point::new(5.0, 0.0));
        dag.set_left_child(x, left_leaf);
        dag.set_right_child(x, right_leaf);

        assert_eq!(dag.traverse(x, Point::new(1.0, 0.0)), trap_id(0));
        assert_eq!(dag.traverse(x, Point::new(9.0, 0.0)), trap_id(1));
        // Equal-x ties route right.
        assert_eq!(dag.traverse(x, Point::new(5.0, 0.0)), trap_id(1));
    }

    #[test]
    fn traverse_y_node_routes_by_above_below() {
        let mut dag = DagArena::new();
        let above_leaf = dag.insert_leaf(trap_id(0));
        let below_leaf = dag.insert_leaf(trap_id(1));
        let s = Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).unwrap();
        let y = dag.insert_y(s);
        dag.set_left_child(y, above_leaf);
        dag.set_right_child(y, below_leaf);

        assert_eq!(dag.traverse(y, Point::new(5.0, 1.0)), trap_id(0));
        assert_eq!(dag.traverse(y, Point::new(5.0, -1.0)), trap_id(1));
        // On-segment ties to below.
        assert_eq!(dag.traverse(y, Point::new(5.0, 0.0)), trap_id(1));
    }

    #[test]
    fn replace_leaf_rewires_every_parent_once() {
        let mut dag = DagArena::new();
        let old_leaf = dag.insert_leaf(trap_id(0));
        let p1 = dag.insert_x(Point::new(1.0, 0.0));
        let p2 = dag.insert_x(Point::new(2.0, 0.0));
        let other = dag.insert_leaf(trap_id(9));
        dag.set_left_child(p1, old_leaf);
        dag.set_right_child(p1, other);
        dag.set_left_child(p2, old_leaf);
        dag.set_right_child(p2, other);

        let new_leaf = dag.insert_leaf(trap_id(1));
        let mut root = p1; // root unrelated to old_leaf in this test
        dag.replace_leaf(&mut root, old_leaf, new_leaf);

        assert_eq!(dag.left(p1), Some(new_leaf));
        assert_eq!(dag.left(p2), Some(new_leaf));
        assert_eq!(dag.parents(new_leaf), &[p1, p2]);
        assert_eq!(root, p1);
    }

    #[test]
    fn replace_leaf_reassigns_root() {
        let mut dag = DagArena::new();
        let old_leaf = dag.insert_leaf(trap_id(0));
        let new_leaf = dag.insert_leaf(trap_id(1));
        let mut root = old_leaf;
        dag.replace_leaf(&mut root, old_leaf, new_leaf);
        assert_eq!(root, new_leaf);
    }
}
