//! Small integer arithmetic helpers
//!
//! Trial division only. The values these run on are curated table bounds
//! and query constants, all well inside `i64`.

/// Primality by trial division
pub fn is_prime(n: i64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }
    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Distinct prime factors of |n|, ascending; empty for 0, 1, -1
pub fn distinct_prime_factors(n: i64) -> Vec<i64> {
    let mut m = n.abs();
    let mut out = Vec::new();
    let mut d = 2;
    while d * d <= m {
        if m % d == 0 {
            out.push(d);
            while m % d == 0 {
                m /= d;
            }
        }
        d += if d == 2 { 1 } else { 2 };
    }
    if m > 1 {
        out.push(m);
    }
    out
}

/// Distinct odd prime factors of |n|, ascending
pub fn odd_prime_divisors(n: i64) -> Vec<i64> {
    distinct_prime_factors(n)
        .into_iter()
        .filter(|&p| p != 2)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_prime() {
        let primes = [2, 3, 5, 7, 11, 13, 97, 7919];
        for p in primes {
            assert!(is_prime(p), "{p} is prime");
        }
        for n in [-7, -1, 0, 1, 4, 9, 91, 7917] {
            assert!(!is_prime(n), "{n} is not prime");
        }
    }

    #[test]
    fn test_distinct_prime_factors() {
        assert_eq!(distinct_prime_factors(360), vec![2, 3, 5]);
        assert_eq!(distinct_prime_factors(-15), vec![3, 5]);
        assert_eq!(distinct_prime_factors(97), vec![97]);
        assert!(distinct_prime_factors(1).is_empty());
        assert!(distinct_prime_factors(0).is_empty());
    }

    #[test]
    fn test_odd_prime_divisors() {
        assert_eq!(odd_prime_divisors(24), vec![3]);
        assert_eq!(odd_prime_divisors(-100), vec![5]);
        assert!(odd_prime_divisors(8).is_empty());
    }

}
