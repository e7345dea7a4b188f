// Copyright (c) The trapmap Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Contains types that describe errors `trapmap` methods can return.

use crate::geometry::Segment;
use std::error;
use std::fmt;

use Error::*;

/// Error type describing the sorts of errors `trapmap` can return.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// A segment failed validation at construction or at `build` entry.
    InvalidSegment(InvalidSegmentReason),
    /// Two input segments cross properly (neither shares an endpoint nor is
    /// collinear-overlapping). Detection is best-effort: the crate does not
    /// perform a full sweep, only the check incidental to construction.
    CrossingSegments(Segment, Segment),
    /// An internal consistency check failed mid-construction. This always
    /// indicates a bug in `trapmap`, never a caller error.
    StructuralInvariantViolated(String),
}

/// Why a segment was rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum InvalidSegmentReason {
    /// Both endpoints share an x-coordinate.
    Vertical,
    /// An endpoint has a non-finite coordinate (NaN or infinite).
    NonFiniteCoordinate,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidSegment(reason) => write!(f, "invalid segment: {}", reason),
            CrossingSegments(a, b) => write!(f, "segments cross: {} and {}", a, b),
            StructuralInvariantViolated(msg) => {
                write!(f, "internal invariant violated in trapezoidal map: {}", msg)
            }
        }
    }
}

impl fmt::Display for InvalidSegmentReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidSegmentReason::Vertical => write!(f, "segment is vertical (p.x == q.x)"),
            InvalidSegmentReason::NonFiniteCoordinate => {
                write!(f, "segment has a non-finite coordinate")
            }
        }
    }
}

impl error::Error for Error {}
