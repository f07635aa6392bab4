//! Combinatorial helper functions

/// Binomial coefficient `C(n, k)`, saturating at `u64::MAX`.
///
/// ```
/// # use fokit::tools::binomial;
/// assert_eq!(binomial(4, 2), 6);
/// assert_eq!(binomial(3, 5), 0);
/// assert_eq!(binomial(7, 0), 1);
/// ```
pub fn binomial(n: usize, k: usize) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k) as u128;
    let n = n as u128;
    let mut result: u128 = 1;
    for i in 0..k {
        // the product of i+1 consecutive integers is divisible by (i+1)!
        result = result * (n - i) / (i + 1);
        if result > u64::MAX as u128 {
            return u64::MAX;
        }
    }
    result as u64
}

/// Find the subset of size `t` of `[0, n)` at a given rank in the lexicographic order.
///
/// The subset is given as strictly increasing positions. The rank must be lower than `C(n, t)`,
/// larger ranks give the last subset.
///
/// ```
/// # use fokit::tools::unrank_lexicographic;
/// assert_eq!(unrank_lexicographic(0, 4, 2), vec![0, 1]);
/// assert_eq!(unrank_lexicographic(3, 4, 2), vec![1, 2]);
/// assert_eq!(unrank_lexicographic(5, 4, 2), vec![2, 3]);
/// ```
pub fn unrank_lexicographic(rank: u64, n: usize, t: usize) -> Vec<usize> {
    let mut positions = Vec::with_capacity(t);
    let mut rank = rank;
    let mut x = 0;
    for i in 0..t {
        let remaining = t - i - 1;
        // the number of subsets starting with x decreases: stop on the last candidate
        while x + remaining + 1 < n {
            let starting_with_x = binomial(n - x - 1, remaining);
            if rank < starting_with_x {
                break;
            }
            rank -= starting_with_x;
            x += 1;
        }
        positions.push(x);
        x += 1;
    }
    positions
}

/// Smallest integer `r` such that `r^d >= value` (1 for an empty dimension)
pub fn ceil_root(value: u64, d: u32) -> u64 {
    if d == 0 || value <= 1 {
        return 1;
    }
    let mut r = (value as f64).powf(1.0 / d as f64).floor().max(1.0) as u64;
    while r.saturating_pow(d) < value {
        r += 1;
    }
    while r > 1 && (r - 1).saturating_pow(d) >= value {
        r -= 1;
    }
    r
}
