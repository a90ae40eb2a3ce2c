//! Interval primitive for the number-set algebra
//!
//! An interval is a contiguous range of reals with independently open or
//! closed endpoints. Unbounded ends are IEEE infinities and are always
//! open. [`NumberSet`](crate::numberset::NumberSet) normalizes collections
//! of intervals into sorted disjoint unions; everything here is the
//! per-interval arithmetic it builds on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single interval on the extended real line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lo: f64,
    pub hi: f64,
    pub lo_closed: bool,
    pub hi_closed: bool,
}

/// Corner product with the 0 * inf = 0 convention (never NaN)
fn corner(a: f64, b: f64) -> f64 {
    if a == 0.0 || b == 0.0 {
        0.0
    } else {
        a * b
    }
}

/// Closure of a corner product endpoint. A closed zero endpoint pins the
/// product at zero no matter what the other factor contributes.
fn corner_closed(a: f64, a_closed: bool, b: f64, b_closed: bool) -> bool {
    (a_closed && b_closed) || (a == 0.0 && a_closed) || (b == 0.0 && b_closed)
}

impl Interval {
    /// Create an interval, forcing unbounded ends open
    pub fn new(lo: f64, hi: f64, lo_closed: bool, hi_closed: bool) -> Self {
        Interval {
            lo,
            hi,
            lo_closed: lo_closed && lo.is_finite(),
            hi_closed: hi_closed && hi.is_finite(),
        }
    }

    /// The whole real line
    pub fn line() -> Self {
        Interval::new(f64::NEG_INFINITY, f64::INFINITY, false, false)
    }

    /// A single point
    pub fn point(v: f64) -> Self {
        Interval::new(v, v, true, true)
    }

    /// Closed interval [a, b]
    pub fn closed(a: f64, b: f64) -> Self {
        Interval::new(a, b, true, true)
    }

    /// Open interval (a, b)
    pub fn open(a: f64, b: f64) -> Self {
        Interval::new(a, b, false, false)
    }

    /// (-inf, b]
    pub fn at_most(b: f64) -> Self {
        Interval::new(f64::NEG_INFINITY, b, false, true)
    }

    /// [a, inf)
    pub fn at_least(a: f64) -> Self {
        Interval::new(a, f64::INFINITY, true, false)
    }

    /// (-inf, b)
    pub fn less_than(b: f64) -> Self {
        Interval::new(f64::NEG_INFINITY, b, false, false)
    }

    /// (a, inf)
    pub fn greater_than(a: f64) -> Self {
        Interval::new(a, f64::INFINITY, false, false)
    }

    /// No points (degenerate bounds, or a point excluded by an open end)
    pub fn is_empty(&self) -> bool {
        self.lo.is_nan()
            || self.hi.is_nan()
            || self.lo > self.hi
            || (self.lo == self.hi && !(self.lo_closed && self.hi_closed))
    }

    /// The whole line
    pub fn is_line(&self) -> bool {
        self.lo == f64::NEG_INFINITY && self.hi == f64::INFINITY
    }

    /// Both ends finite
    pub fn is_bounded(&self) -> bool {
        self.lo.is_finite() && self.hi.is_finite()
    }

    pub fn contains(&self, x: f64) -> bool {
        let above = x > self.lo || (x == self.lo && self.lo_closed);
        let below = x < self.hi || (x == self.hi && self.hi_closed);
        above && below
    }

    /// Intersection; may be empty
    pub fn intersect(&self, other: &Interval) -> Interval {
        let (lo, lo_closed) = if self.lo > other.lo {
            (self.lo, self.lo_closed)
        } else if other.lo > self.lo {
            (other.lo, other.lo_closed)
        } else {
            (self.lo, self.lo_closed && other.lo_closed)
        };
        let (hi, hi_closed) = if self.hi < other.hi {
            (self.hi, self.hi_closed)
        } else if other.hi < self.hi {
            (other.hi, other.hi_closed)
        } else {
            (self.hi, self.hi_closed && other.hi_closed)
        };
        Interval::new(lo, hi, lo_closed, hi_closed)
    }

    /// Reflection through zero
    pub fn negated(&self) -> Interval {
        Interval::new(-self.hi, -self.lo, self.hi_closed, self.lo_closed)
    }

    /// Minkowski sum: endpoint-wise addition, closed only where both
    /// contributing endpoints are closed
    pub fn minkowski_add(&self, other: &Interval) -> Interval {
        Interval::new(
            self.lo + other.lo,
            self.hi + other.hi,
            self.lo_closed && other.lo_closed,
            self.hi_closed && other.hi_closed,
        )
    }

    /// Product of two intervals that each lie entirely on one side of
    /// zero (endpoints may touch zero). One corner supplies the lower
    /// bound and the opposite corner the upper, depending on the sign
    /// combination.
    pub fn sign_pure_product(&self, other: &Interval) -> Interval {
        let self_pos = self.lo >= 0.0;
        let other_pos = other.lo >= 0.0;
        let ((la, lac, lb, lbc), (ha, hac, hb, hbc)) = match (self_pos, other_pos) {
            (true, true) => (
                (self.lo, self.lo_closed, other.lo, other.lo_closed),
                (self.hi, self.hi_closed, other.hi, other.hi_closed),
            ),
            (false, false) => (
                (self.hi, self.hi_closed, other.hi, other.hi_closed),
                (self.lo, self.lo_closed, other.lo, other.lo_closed),
            ),
            (false, true) => (
                (self.lo, self.lo_closed, other.hi, other.hi_closed),
                (self.hi, self.hi_closed, other.lo, other.lo_closed),
            ),
            (true, false) => (
                (self.hi, self.hi_closed, other.lo, other.lo_closed),
                (self.lo, self.lo_closed, other.hi, other.hi_closed),
            ),
        };
        Interval::new(
            corner(la, lb),
            corner(ha, hb),
            corner_closed(la, lac, lb, lbc),
            corner_closed(ha, hac, hb, hbc),
        )
    }

    /// Image under x -> 1/x. Caller must have split at zero first: the
    /// interval may not contain zero in its interior, though an open zero
    /// endpoint is fine (it maps to an open infinity).
    pub fn reciprocal(&self) -> Interval {
        let (lo, lo_closed) = if self.hi == 0.0 {
            (f64::NEG_INFINITY, false)
        } else if self.hi.is_infinite() {
            (0.0, false)
        } else {
            (1.0 / self.hi, self.hi_closed)
        };
        let (hi, hi_closed) = if self.lo == 0.0 {
            (f64::INFINITY, false)
        } else if self.lo.is_infinite() {
            (0.0, false)
        } else {
            (1.0 / self.lo, self.lo_closed)
        };
        Interval::new(lo, hi, lo_closed, hi_closed)
    }

    /// Part of this interval at or below zero
    pub fn nonpos_part(&self) -> Interval {
        self.intersect(&Interval::at_most(0.0))
    }

    /// Part of this interval at or above zero
    pub fn nonneg_part(&self) -> Interval {
        self.intersect(&Interval::at_least(0.0))
    }

    /// Shrink finite endpoints to the extreme integers inside the
    /// interval; both surviving ends become closed. May come out empty.
    pub fn integer_snap(&self) -> Interval {
        let (lo, lo_closed) = if self.lo.is_finite() {
            let l = if self.lo_closed {
                self.lo.ceil()
            } else {
                self.lo.floor() + 1.0
            };
            (l, true)
        } else {
            (self.lo, false)
        };
        let (hi, hi_closed) = if self.hi.is_finite() {
            let h = if self.hi_closed {
                self.hi.floor()
            } else {
                self.hi.ceil() - 1.0
            };
            (h, true)
        } else {
            (self.hi, false)
        };
        Interval {
            lo,
            hi,
            lo_closed,
            hi_closed,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.lo_closed { '[' } else { '(' };
        let close = if self.hi_closed { ']' } else { ')' };
        write!(f, "{}{}, {}{}", open, self.lo, self.hi, close)
    }
}
