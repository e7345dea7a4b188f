// Copyright (c) The trapmap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Points, segments, and the orientation predicates the rest of the crate is built on.

use crate::errors::{Error, InvalidSegmentReason};
use std::fmt;

/// A point in the plane, stored as a pair of `f64` coordinates.
///
/// `Point` is immutable after construction and carries no invariants beyond
/// finiteness of its coordinates (checked where it matters, not at every
/// construction site, since most points here are derived from already-checked
/// segment endpoints).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A non-vertical line segment, normalized so that `p.x < q.x`.
///
/// Construction is the only place vertical or non-finite segments are
/// rejected; every other part of the crate can assume a `Segment`'s endpoints
/// are ordered left-to-right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    /// The left endpoint (strictly smaller x).
    pub p: Point,
    /// The right endpoint (strictly greater x).
    pub q: Point,
}

impl Segment {
    /// Builds a segment from two endpoints, normalizing left/right order.
    ///
    /// Returns [`Error::InvalidSegment`] if the endpoints share an x-coordinate
    /// (a vertical segment) or if either coordinate is non-finite.
    pub fn new(a: Point, b: Point) -> Result<Self, Error> {
        if !a.is_finite() || !b.is_finite() {
            return Err(Error::InvalidSegment(InvalidSegmentReason::NonFiniteCoordinate));
        }
        if a.x == b.x {
            return Err(Error::InvalidSegment(InvalidSegmentReason::Vertical));
        }
        let (p, q) = if a.x < b.x { (a, b) } else { (b, a) };
        Ok(Self { p, q })
    }

    /// Builds a horizontal segment, used only for the bounding box's top and
    /// bottom edges. Horizontal segments are otherwise disallowed (§ Non-goals).
    pub(crate) fn horizontal(y: f64, x0: f64, x1: f64) -> Self {
        let (x0, x1) = if x0 < x1 { (x0, x1) } else { (x1, x0) };
        Self {
            p: Point::new(x0, y),
            q: Point::new(x1, y),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}--{}", self.p, self.q)
    }
}

/// The axis-aligned rectangle that becomes the sole initial trapezoid.
/// Computed once, from the raw segment set, at `build()` entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub lower_left: Point,
    pub lower_right: Point,
    pub upper_left: Point,
    pub upper_right: Point,
}

impl BoundingBox {
    /// Computes the extreme coordinates of every segment endpoint and
    /// inflates the resulting rectangle by `margin` on all four sides.
    ///
    /// Returns `None` for an empty segment set (there is no "extreme
    /// coordinate" to inflate); callers fall back to a default unit box.
    pub fn from_segments<'a>(segments: impl IntoIterator<Item = &'a Segment>, margin: f64) -> Option<Self> {
        let mut min_x = f64::INFINITY;
        let mut max_x = f64::NEG_INFINITY;
        let mut min_y = f64::INFINITY;
        let mut max_y = f64::NEG_INFINITY;

        let mut any = false;
        for s in segments {
            any = true;
            for pt in [s.p, s.q] {
                min_x = min_x.min(pt.x);
                max_x = max_x.max(pt.x);
                min_y = min_y.min(pt.y);
                max_y = max_y.max(pt.y);
            }
        }
        if !any {
            return None;
        }

        let x0 = min_x - margin;
        let x1 = max_x + margin;
        let y0 = min_y - margin;
        let y1 = max_y + margin;
        Some(Self {
            lower_left: Point::new(x0, y0),
            lower_right: Point::new(x1, y0),
            upper_left: Point::new(x0, y1),
            upper_right: Point::new(x1, y1),
        })
    }

    /// The box's top edge, as the horizontal segment used for `Trapezoid::top`.
    pub fn top(&self) -> Segment {
        Segment::horizontal(self.upper_left.y, self.upper_left.x, self.upper_right.x)
    }

    /// The box's bottom edge, as the horizontal segment used for `Trapezoid::bottom`.
    pub fn bottom(&self) -> Segment {
        Segment::horizontal(self.lower_left.y, self.lower_left.x, self.lower_right.x)
    }
}

/// `a` lies strictly to the left of `b`, comparing x-coordinates only.
///
/// Ties (equal x) are *not* "left": callers that need the x-node tie-break of
/// routing equal-x points to the right must use `!lies_left_of(b, a)` rather
/// than negating this function, to keep the rule explicit at the call site.
pub fn lies_left_of(a: Point, b: Point) -> bool {
    a.x < b.x
}

/// `p` lies strictly above segment `s` (classified as the open half-plane
/// above the line through `s.p`/`s.q`, restricted to the segment's x-range
/// conceptually -- callers are expected to only invoke this when `p.x` falls
/// within `[s.p.x, s.q.x]`, as is always the case along `follow_segment`).
///
/// Uses the 2D cross product of `(s.q - s.p)` and `(s.q - p)`. A zero cross
/// product (p collinear with s) is classified as *not above* -- i.e. on or
/// below -- the fixed tie-break every caller of this predicate relies on.
pub fn lies_above(p: Point, s: Segment) -> bool {
    cross(s.q.x - s.p.x, s.q.y - s.p.y, s.q.x - p.x, s.q.y - p.y) > 0.0
}

fn cross(v1x: f64, v1y: f64, v2x: f64, v2y: f64) -> f64 {
    v1x * v2y - v1y * v2x
}

fn orientation(a: Point, b: Point, c: Point) -> f64 {
    cross(b.x - a.x, b.y - a.y, c.x - a.x, c.y - a.y)
}

/// Best-effort check for two segments properly crossing -- intersecting at a
/// point interior to both, rather than merely sharing an endpoint or running
/// collinear. This is the check incidental to `build`'s `O(n^2)` pairwise
/// pass, not a robust sweep: segments that only touch at a shared endpoint,
/// or that overlap collinearly, are not reported as crossing. That leaves
/// collinear overlap undefined by this crate's contract; it treats the case
/// permissively since shared endpoints are explicitly allowed input.
pub fn properly_crosses(a: Segment, b: Segment) -> bool {
    let d1 = orientation(b.p, b.q, a.p);
    let d2 = orientation(b.p, b.q, a.q);
    let d3 = orientation(a.p, a.q, b.p);
    let d4 = orientation(a.p, a.q, b.q);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}
