//! Integer specialization of the number-set algebra
//!
//! An [`IntegerSet`] wraps a [`NumberSet`] kept in integral form: finite
//! endpoints are integers, both closed, and intervals separated by a gap
//! holding no integer are merged. Arithmetic routes through the real
//! algebra and re-snaps, so division comes out as the integer cover of
//! the rational image: `[6,9] / [2,4]` is `[2,4]`.
//!
//! On top of the algebra it adds ordered point iteration (including
//! one-sided and fully infinite sets), greedy cover pricing
//! ([`bound_under`](IntegerSet::bound_under)) and the Stickelberger
//! case-split of a discriminant range into ramified-prime sets
//! ([`stickelberger`](IntegerSet::stickelberger)).

use crate::arith::odd_prime_divisors;
use crate::interval::Interval;
use crate::numberset::NumberSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Add, Deref, Div, Mul, Neg, Sub};

/// A set of integers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegerSet(NumberSet);

impl IntegerSet {
    /// Snap a real set to its integer points
    pub fn from_set(set: NumberSet) -> Self {
        IntegerSet(set.into_integral())
    }

    pub fn empty() -> Self {
        IntegerSet(NumberSet::empty().into_integral())
    }

    /// All integers
    pub fn integers() -> Self {
        IntegerSet(NumberSet::reals().into_integral())
    }

    /// {a, a+1, ..., b}
    pub fn closed(a: i64, b: i64) -> Self {
        IntegerSet::from_set(NumberSet::closed(a as f64, b as f64))
    }

    pub fn point(v: i64) -> Self {
        IntegerSet::from_set(NumberSet::point(v as f64))
    }

    pub fn points<I: IntoIterator<Item = i64>>(values: I) -> Self {
        IntegerSet::from_set(NumberSet::points(values.into_iter().map(|v| v as f64)))
    }

    pub fn at_most(b: i64) -> Self {
        IntegerSet::from_set(NumberSet::at_most(b as f64))
    }

    pub fn at_least(a: i64) -> Self {
        IntegerSet::from_set(NumberSet::at_least(a as f64))
    }

    pub fn as_set(&self) -> &NumberSet {
        &self.0
    }

    pub fn into_set(self) -> NumberSet {
        self.0
    }

    /// Smallest element; None when empty or unbounded below
    pub fn min(&self) -> Option<i64> {
        self.0.inf().filter(|v| v.is_finite()).map(|v| v as i64)
    }

    /// Largest element; None when empty or unbounded above
    pub fn max(&self) -> Option<i64> {
        self.0.sup().filter(|v| v.is_finite()).map(|v| v as i64)
    }

    /// Both ends finite (the empty set counts as finite)
    pub fn is_finite(&self) -> bool {
        self.0.intervals().iter().all(Interval::is_bounded)
    }

    pub fn contains(&self, n: i64) -> bool {
        self.0.contains(n as f64)
    }

    pub fn union(&self, other: &IntegerSet) -> IntegerSet {
        IntegerSet::from_set(self.0.union(&other.0))
    }

    pub fn intersection(&self, other: &IntegerSet) -> IntegerSet {
        IntegerSet::from_set(self.0.intersection(&other.0))
    }

    pub fn difference(&self, other: &IntegerSet) -> IntegerSet {
        IntegerSet::from_set(self.0.difference(&other.0))
    }

    pub fn is_subset(&self, other: &IntegerSet) -> bool {
        self.0.is_subset(&other.0)
    }

    /// Iterate the integer points. Finite and bounded-below sets ascend;
    /// sets bounded only above descend from their maximum; sets unbounded
    /// on both sides alternate outward: 0, 1, -1, 2, -2, ...
    pub fn iter(&self) -> IntPoints {
        let ivs = self.0.intervals();
        let mode = match (self.0.inf(), self.0.sup()) {
            (None, _) => Mode::Done,
            (Some(lo), _) if lo.is_finite() => Mode::Ascending {
                intervals: ivs.to_vec(),
                idx: 0,
                cursor: lo,
            },
            (_, Some(hi)) if hi.is_finite() => Mode::Descending {
                intervals: ivs.to_vec(),
                idx: ivs.len() - 1,
                cursor: hi,
            },
            _ => Mode::Alternating {
                set: self.0.clone(),
                mag: 0,
                tried_pos: false,
            },
        };
        IntPoints { mode }
    }

    /// Greedy cover pricing over an ordered tier list. Each cover that
    /// meets the remaining set is subtracted and its cost folded in (max);
    /// the answer is the highest tier needed, or None when the tiers do
    /// not exhaust the set. The empty set costs 0.
    pub fn bound_under(&self, ranked_covers: &[(IntegerSet, f64)]) -> Option<f64> {
        let mut remaining = self.clone();
        let mut cost = 0.0_f64;
        for (cover, price) in ranked_covers {
            if remaining.0.is_empty() {
                break;
            }
            if !remaining.intersection(cover).0.is_empty() {
                remaining = remaining.difference(cover);
                cost = cost.max(*price);
            }
        }
        if remaining.0.is_empty() {
            Some(cost)
        } else {
            None
        }
    }

    /// Case-split a range of absolute discriminants into ramified odd
    /// prime sets. For each m in the set and each signature count r2 in
    /// `r2_options` (with 2*r2 <= n), the signed discriminant
    /// `(-1)^r2 * m` must be 0 or 1 mod 4 (Stickelberger); surviving m
    /// contribute their odd prime divisors. Returns the deduplicated,
    /// ordered list of divisor tuples, or None when the set is infinite.
    pub fn stickelberger(&self, n: i64, r2_options: &[i64]) -> Option<Vec<Vec<i64>>> {
        if !self.is_finite() {
            return None;
        }
        let mut tuples: BTreeSet<Vec<i64>> = BTreeSet::new();
        for m in self.iter() {
            if m == 0 {
                continue;
            }
            let admissible = r2_options.iter().any(|&r2| {
                if r2 < 0 || 2 * r2 > n {
                    return false;
                }
                let signed = if r2 % 2 == 0 { m } else { -m };
                matches!(signed.rem_euclid(4), 0 | 1)
            });
            if admissible {
                tuples.insert(odd_prime_divisors(m));
            }
        }
        Some(tuples.into_iter().collect())
    }
}

impl Deref for IntegerSet {
    type Target = NumberSet;

    fn deref(&self) -> &NumberSet {
        &self.0
    }
}

impl<'a> IntoIterator for &'a IntegerSet {
    type Item = i64;
    type IntoIter = IntPoints;

    fn into_iter(self) -> IntPoints {
        self.iter()
    }
}

/// Ordered point iterator over an [`IntegerSet`]
pub struct IntPoints {
    mode: Mode,
}

enum Mode {
    Done,
    Ascending {
        intervals: Vec<Interval>,
        idx: usize,
        cursor: f64,
    },
    Descending {
        intervals: Vec<Interval>,
        idx: usize,
        cursor: f64,
    },
    Alternating {
        set: NumberSet,
        mag: i64,
        tried_pos: bool,
    },
}

impl Iterator for IntPoints {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        match &mut self.mode {
            Mode::Done => None,
            Mode::Ascending {
                intervals,
                idx,
                cursor,
            } => {
                if *cursor > intervals[*idx].hi {
                    *idx += 1;
                    if *idx >= intervals.len() {
                        self.mode = Mode::Done;
                        return None;
                    }
                    *cursor = intervals[*idx].lo;
                }
                let v = *cursor as i64;
                *cursor += 1.0;
                Some(v)
            }
            Mode::Descending {
                intervals,
                idx,
                cursor,
            } => {
                if *cursor < intervals[*idx].lo {
                    if *idx == 0 {
                        self.mode = Mode::Done;
                        return None;
                    }
                    *idx -= 1;
                    *cursor = intervals[*idx].hi;
                }
                let v = *cursor as i64;
                *cursor -= 1.0;
                Some(v)
            }
            Mode::Alternating {
                set,
                mag,
                tried_pos,
            } => {
                // candidates 0, 1, -1, 2, -2, ...; gaps between the two
                // infinite tails are finite, so the scan always lands
                loop {
                    let candidate = if *mag == 0 {
                        *mag = 1;
                        *tried_pos = false;
                        0
                    } else if !*tried_pos {
                        *tried_pos = true;
                        *mag
                    } else {
                        let v = -*mag;
                        *mag += 1;
                        *tried_pos = false;
                        v
                    };
                    if set.contains(candidate as f64) {
                        return Some(candidate);
                    }
                }
            }
        }
    }
}

impl Neg for &IntegerSet {
    type Output = IntegerSet;

    fn neg(self) -> IntegerSet {
        IntegerSet::from_set(-&self.0)
    }
}

impl Add for &IntegerSet {
    type Output = IntegerSet;

    fn add(self, rhs: &IntegerSet) -> IntegerSet {
        IntegerSet::from_set(&self.0 + &rhs.0)
    }
}

impl Sub for &IntegerSet {
    type Output = IntegerSet;

    fn sub(self, rhs: &IntegerSet) -> IntegerSet {
        IntegerSet::from_set(&self.0 - &rhs.0)
    }
}

impl Mul for &IntegerSet {
    type Output = IntegerSet;

    fn mul(self, rhs: &IntegerSet) -> IntegerSet {
        IntegerSet::from_set(&self.0 * &rhs.0)
    }
}

impl Div for &IntegerSet {
    type Output = IntegerSet;

    fn div(self, rhs: &IntegerSet) -> IntegerSet {
        IntegerSet::from_set(&self.0 / &rhs.0)
    }
}

impl fmt::Display for IntegerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Z n {}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_range_basics() {
        let s = IntegerSet::closed(3, 7);
        assert!(s.is_finite());
        assert_eq!(s.min(), Some(3));
        assert_eq!(s.max(), Some(7));
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_snapping_from_real_set() {
        let s = IntegerSet::from_set(NumberSet::open(1.0, 4.5));
        assert_eq!(s.min(), Some(2));
        assert_eq!(s.max(), Some(4));
    }

    #[test]
    fn test_points_iteration_order() {
        let s = IntegerSet::points([9, 2, 5, 2]);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![2, 5, 9]);
    }

    #[test]
    fn test_one_sided_iteration() {
        let up: Vec<i64> = IntegerSet::at_least(4).iter().take(3).collect();
        assert_eq!(up, vec![4, 5, 6]);

        let down: Vec<i64> = IntegerSet::at_most(-2).iter().take(3).collect();
        assert_eq!(down, vec![-2, -3, -4]);
    }

    #[test]
    fn test_whole_line_iteration_alternates() {
        let line: Vec<i64> = IntegerSet::integers().iter().take(5).collect();
        assert_eq!(line, vec![0, 1, -1, 2, -2]);
    }

    #[test]
    fn test_two_tailed_iteration_skips_gap() {
        let tails = IntegerSet::at_most(-5).union(&IntegerSet::at_least(5));
        let first: Vec<i64> = tails.iter().take(4).collect();
        assert_eq!(first, vec![5, -5, 6, -6]);
    }

    #[test]
    fn test_addition_endpoints() {
        let a = IntegerSet::closed(1, 3);
        let b = IntegerSet::closed(10, 20);
        let s = &a + &b;
        assert_eq!(s.min(), Some(11));
        assert_eq!(s.max(), Some(23));
    }

    #[test]
    fn test_multiplication_is_conservative_cover() {
        let a = IntegerSet::closed(2, 4);
        let prod = &a * &a;
        let cover = IntegerSet::closed(4, 16);
        assert!(
            prod.is_subset(&cover) && cover.is_subset(&prod),
            "product and convex cover must coincide as sets"
        );
    }

    #[test]
    fn test_division_snaps_to_integers() {
        let q = &IntegerSet::closed(6, 9) / &IntegerSet::closed(2, 4);
        assert_eq!(q, IntegerSet::closed(2, 4));
    }

    #[test]
    fn test_bound_under_tiers() {
        let tiers = vec![
            (IntegerSet::closed(1, 10), 1.0),
            (IntegerSet::closed(11, 20), 5.0),
            (IntegerSet::closed(21, 30), 9.0),
        ];
        assert_eq!(IntegerSet::closed(2, 8).bound_under(&tiers), Some(1.0));
        assert_eq!(IntegerSet::closed(5, 15).bound_under(&tiers), Some(5.0));
        assert_eq!(
            IntegerSet::closed(5, 35).bound_under(&tiers),
            None,
            "31..35 escapes every tier"
        );
        assert_eq!(IntegerSet::empty().bound_under(&tiers), Some(0.0));
    }

    #[test]
    fn test_stickelberger_parity_filter() {
        // degree 2, totally real (r2 = 0): signed disc = m, keep m = 0,1 mod 4
        let s = IntegerSet::closed(5, 8);
        let tuples = s.stickelberger(2, &[0]).unwrap();
        // m = 5 (5), m = 8 (none odd); 6 and 7 are 2,3 mod 4
        assert_eq!(tuples, vec![vec![], vec![5]]);

        // imaginary quadratic (r2 = 1): signed disc = -m, keep m = 0,3 mod 4
        let tuples = s.stickelberger(2, &[1]).unwrap();
        // m = 7 -> {7}, m = 8 -> {}
        assert_eq!(tuples, vec![vec![], vec![7]]);

        assert!(
            IntegerSet::at_least(5).stickelberger(2, &[0]).is_none(),
            "infinite ranges cannot be enumerated"
        );
    }

    #[test]
    fn test_min_max_on_unbounded() {
        assert_eq!(IntegerSet::at_least(3).min(), Some(3));
        assert_eq!(IntegerSet::at_least(3).max(), None);
        assert_eq!(IntegerSet::empty().min(), None);
        assert!(!IntegerSet::integers().is_finite());
    }
}
