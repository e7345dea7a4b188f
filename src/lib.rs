// Copyright (c) The trapmap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Randomized incremental construction of a trapezoidal map, and the search
//! DAG (history graph) that answers "which face contains this point?" in
//! expected `O(log n)` time.
//!
//! `trapmap` builds a planar subdivision from a set of non-crossing line
//! segments by the Mulmuley/Seidel randomized incremental algorithm: a
//! [`TrapezoidalMap`](map::TrapezoidalMap) of trapezoids with a four-way
//! neighbor graph, paired with a [`SearchStructure`](search::SearchStructure)
//! whose leaves are exactly those trapezoids. Both structures are rewritten
//! together, one segment at a time, as described in the module docs of
//! [`build`].
//!
//! # Example
//!
//! ```
//! use trapmap::{build, BuildOptions, Point, Segment};
//!
//! let segments = vec![
//!     Segment::new(Point::new(1.0, 3.0), Point::new(5.0, 4.0)).unwrap(),
//!     Segment::new(Point::new(3.0, 2.0), Point::new(6.0, 1.0)).unwrap(),
//! ];
//! let map = build(segments, BuildOptions::default()).unwrap();
//! let trapezoid_id = map.query(Point::new(4.0, 3.0)).expect("point lies inside the bounding box");
//! println!("{}", map.trapezoid(trapezoid_id));
//! ```
//!
//! # Scope
//!
//! The crate does not parse input, render anything, or drive a CLI -- it
//! consumes an in-memory segment set and answers point-location queries.
//! Segment-segment intersection is not computed beyond a best-effort crossing
//! check at `build` entry: segments are assumed non-crossing, and crossing
//! detection is not a full sweep.

#![warn(missing_docs)]

pub mod arena;
pub mod build;
pub mod dag;
pub mod errors;
pub mod geometry;
pub mod map;
pub mod search;
pub mod trapezoid;

#[cfg(test)]
mod unit_tests;

pub use build::{build, BuildOptions, Map};
pub use dag::{DagNode, DagNodeId, DagNodeKind};
pub use errors::{Error, InvalidSegmentReason};
pub use geometry::{BoundingBox, Point, Segment};
pub use map::TrapezoidalMap;
pub use search::SearchStructure;
pub use trapezoid::{Neighbors, Trapezoid, TrapezoidId};
