//! Sets of real numbers as normalized unions of disjoint intervals
//!
//! Every operation renormalizes: intervals stay sorted by lower bound,
//! non-overlapping, with unbounded ends open. A set carries an `integral`
//! flag; when it is on, normalization also snaps finite endpoints to the
//! extreme integers inside each interval and merges intervals separated
//! by a gap of less than 2 (see [`IntegerSet`](crate::integerset::IntegerSet)
//! for the integer-only API on top of this).
//!
//! Multiplication splits every interval at zero and combines the four
//! sign-pure pieces through corner products; for real sets this is the
//! exact image, for integral sets a conservative convex cover (it may
//! contain integers that no factor pair produces). Inversion and division
//! silently exclude zero rather than raising.

use crate::interval::Interval;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A set of reals (or integers) as a sorted union of disjoint intervals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberSet {
    intervals: Vec<Interval>,
    integral: bool,
}

impl NumberSet {
    /// The whole real line
    pub fn reals() -> Self {
        NumberSet {
            intervals: vec![Interval::line()],
            integral: false,
        }
    }

    /// The empty set
    pub fn empty() -> Self {
        NumberSet {
            intervals: Vec::new(),
            integral: false,
        }
    }

    /// Closed interval [a, b]
    pub fn closed(a: f64, b: f64) -> Self {
        NumberSet::from_intervals(vec![Interval::closed(a, b)], false)
    }

    /// Open interval (a, b)
    pub fn open(a: f64, b: f64) -> Self {
        NumberSet::from_intervals(vec![Interval::open(a, b)], false)
    }

    /// A single point
    pub fn point(v: f64) -> Self {
        NumberSet::from_intervals(vec![Interval::point(v)], false)
    }

    /// A discrete point set
    pub fn points<I: IntoIterator<Item = f64>>(values: I) -> Self {
        let intervals = values.into_iter().map(Interval::point).collect();
        NumberSet::from_intervals(intervals, false)
    }

    /// (-inf, b]
    pub fn at_most(b: f64) -> Self {
        NumberSet::from_intervals(vec![Interval::at_most(b)], false)
    }

    /// [a, inf)
    pub fn at_least(a: f64) -> Self {
        NumberSet::from_intervals(vec![Interval::at_least(a)], false)
    }

    /// (-inf, b)
    pub fn less_than(b: f64) -> Self {
        NumberSet::from_intervals(vec![Interval::less_than(b)], false)
    }

    /// (a, inf)
    pub fn greater_than(a: f64) -> Self {
        NumberSet::from_intervals(vec![Interval::greater_than(a)], false)
    }

    /// Build from raw intervals and normalize
    pub fn from_intervals(intervals: Vec<Interval>, integral: bool) -> Self {
        let mut set = NumberSet {
            intervals,
            integral,
        };
        set.normalize();
        set
    }

    /// Restrict to integer points; endpoints snap inward
    pub fn into_integral(mut self) -> Self {
        if !self.integral {
            self.integral = true;
            self.normalize();
        }
        self
    }

    pub fn integral(&self) -> bool {
        self.integral
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Not the whole line
    pub fn restricted(&self) -> bool {
        !(self.intervals.len() == 1 && self.intervals[0].is_line())
    }

    /// Infimum; None when empty
    pub fn inf(&self) -> Option<f64> {
        self.intervals.first().map(|iv| iv.lo)
    }

    /// Supremum; None when empty
    pub fn sup(&self) -> Option<f64> {
        self.intervals.last().map(|iv| iv.hi)
    }

    pub fn contains(&self, x: f64) -> bool {
        self.intervals.iter().any(|iv| iv.contains(x))
    }

    /// Restore the invariants: snapped (if integral), sorted, disjoint
    fn normalize(&mut self) {
        let integral = self.integral;
        let mut items = std::mem::take(&mut self.intervals);
        if integral {
            for iv in &mut items {
                *iv = iv.integer_snap();
            }
        }
        items.retain(|iv| !iv.is_empty());
        items.sort_by(|a, b| {
            a.lo.partial_cmp(&b.lo)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.lo_closed.cmp(&a.lo_closed))
        });

        let mut merged: Vec<Interval> = Vec::with_capacity(items.len());
        for iv in items {
            match merged.last_mut() {
                Some(last) if joinable(last, &iv, integral) => {
                    if iv.hi > last.hi {
                        last.hi = iv.hi;
                        last.hi_closed = iv.hi_closed;
                    } else if iv.hi == last.hi {
                        last.hi_closed |= iv.hi_closed;
                    }
                }
                _ => merged.push(iv),
            }
        }
        self.intervals = merged;
    }

    pub fn union(&self, other: &NumberSet) -> NumberSet {
        let mut intervals = self.intervals.clone();
        intervals.extend_from_slice(&other.intervals);
        NumberSet::from_intervals(intervals, self.integral && other.integral)
    }

    pub fn intersection(&self, other: &NumberSet) -> NumberSet {
        let mut intervals = Vec::new();
        for a in &self.intervals {
            for b in &other.intervals {
                let iv = a.intersect(b);
                if !iv.is_empty() {
                    intervals.push(iv);
                }
            }
        }
        NumberSet::from_intervals(intervals, self.integral || other.integral)
    }

    pub fn difference(&self, other: &NumberSet) -> NumberSet {
        self.intersection(&other.complement())
    }

    /// Real-line complement (the result is a real set; intersecting with
    /// an integral set restores the integer domain)
    pub fn complement(&self) -> NumberSet {
        let mut out = Vec::new();
        let mut cursor = f64::NEG_INFINITY;
        let mut cursor_closed = false;
        for iv in &self.intervals {
            out.push(Interval::new(cursor, iv.lo, cursor_closed, !iv.lo_closed));
            cursor = iv.hi;
            cursor_closed = !iv.hi_closed;
        }
        out.push(Interval::new(cursor, f64::INFINITY, cursor_closed, false));
        NumberSet::from_intervals(out, false)
    }

    /// Every element of self is a subset member of other
    pub fn is_subset(&self, other: &NumberSet) -> bool {
        self.difference(other).is_empty()
    }

    /// Every element of self <= every element of other
    pub fn all_le(&self, other: &NumberSet) -> bool {
        match (self.sup(), other.inf()) {
            (Some(s), Some(i)) => s <= i,
            _ => true,
        }
    }

    /// Every element of self < every element of other
    pub fn all_lt(&self, other: &NumberSet) -> bool {
        match (self.intervals.last(), other.intervals.first()) {
            (Some(a), Some(b)) => a.hi < b.lo || (a.hi == b.lo && !(a.hi_closed && b.lo_closed)),
            _ => true,
        }
    }

    /// Every element of self >= every element of other
    pub fn all_ge(&self, other: &NumberSet) -> bool {
        other.all_le(self)
    }

    /// Every element of self > every element of other
    pub fn all_gt(&self, other: &NumberSet) -> bool {
        other.all_lt(self)
    }

    /// Supremum at most hi
    pub fn bounded_by(&self, hi: f64) -> bool {
        self.sup().is_none_or(|s| s <= hi)
    }

    /// Contained in [lo, hi]
    pub fn within(&self, lo: f64, hi: f64) -> bool {
        match (self.inf(), self.sup()) {
            (Some(i), Some(s)) => i >= lo && s <= hi,
            _ => true,
        }
    }

    /// Image under x -> 1/x. Zero is silently excluded, never an error;
    /// the set is split into its negative and positive parts first so the
    /// pole is never crossed.
    pub fn inverse(&self) -> NumberSet {
        let mut out = Vec::new();
        for iv in &self.intervals {
            for part in [
                iv.intersect(&Interval::less_than(0.0)),
                iv.intersect(&Interval::greater_than(0.0)),
            ] {
                if !part.is_empty() {
                    out.push(part.reciprocal());
                }
            }
        }
        NumberSet::from_intervals(out, false)
    }

    /// Union of the non-negative part and the reflected negative part
    pub fn abs_set(&self) -> NumberSet {
        let pos = self.intersection(&NumberSet::at_least(0.0));
        let neg = self.intersection(&NumberSet::at_most(0.0));
        pos.union(&-&neg)
    }

    /// Clip self to (-inf, sup(other)^k]. Transfers a bound on one
    /// monotonically related quantity onto another; a no-op when the
    /// other set is unbounded above or empty.
    pub fn pow_cap(&self, other: &NumberSet, k: u32) -> NumberSet {
        match other.sup() {
            Some(m) if m.is_finite() => self.intersection(&NumberSet::at_most(m.powi(k as i32))),
            _ => self.clone(),
        }
    }
}

/// Overlap or adjacency test used by the normalization merge. Integral
/// sets additionally merge across gaps smaller than 2 (their snapped
/// endpoints are integers, so a gap of 1 holds no points).
fn joinable(last: &Interval, next: &Interval, integral: bool) -> bool {
    if integral {
        next.lo <= last.hi + 1.0
    } else {
        next.lo < last.hi || (next.lo == last.hi && (last.hi_closed || next.lo_closed))
    }
}

impl Neg for &NumberSet {
    type Output = NumberSet;

    fn neg(self) -> NumberSet {
        let intervals = self.intervals.iter().map(Interval::negated).collect();
        NumberSet::from_intervals(intervals, self.integral)
    }
}

impl Neg for NumberSet {
    type Output = NumberSet;

    fn neg(self) -> NumberSet {
        -&self
    }
}

impl Add for &NumberSet {
    type Output = NumberSet;

    fn add(self, rhs: &NumberSet) -> NumberSet {
        let mut out = Vec::new();
        for a in self.intervals() {
            for b in rhs.intervals() {
                out.push(a.minkowski_add(b));
            }
        }
        NumberSet::from_intervals(out, self.integral && rhs.integral)
    }
}

impl Sub for &NumberSet {
    type Output = NumberSet;

    fn sub(self, rhs: &NumberSet) -> NumberSet {
        self + &-rhs
    }
}

impl Mul for &NumberSet {
    type Output = NumberSet;

    fn mul(self, rhs: &NumberSet) -> NumberSet {
        let mut out = Vec::new();
        for a in self.intervals() {
            for b in rhs.intervals() {
                for pa in [a.nonpos_part(), a.nonneg_part()] {
                    if pa.is_empty() {
                        continue;
                    }
                    for pb in [b.nonpos_part(), b.nonneg_part()] {
                        if pb.is_empty() {
                            continue;
                        }
                        out.push(pa.sign_pure_product(&pb));
                    }
                }
            }
        }
        NumberSet::from_intervals(out, self.integral && rhs.integral)
    }
}

impl Div for &NumberSet {
    type Output = NumberSet;

    fn div(self, rhs: &NumberSet) -> NumberSet {
        self * &rhs.inverse()
    }
}

macro_rules! owned_binop {
    ($trait:ident, $method:ident) => {
        impl $trait for NumberSet {
            type Output = NumberSet;

            fn $method(self, rhs: NumberSet) -> NumberSet {
                (&self).$method(&rhs)
            }
        }
    };
}

owned_binop!(Add, add);
owned_binop!(Sub, sub);
owned_binop!(Mul, mul);
owned_binop!(Div, div);

impl fmt::Display for NumberSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.intervals.is_empty() {
            return write!(f, "{{}}");
        }
        let parts: Vec<String> = self.intervals.iter().map(|iv| iv.to_string()).collect();
        write!(f, "{}", parts.join(" u "))
    }
}
