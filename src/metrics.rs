//! Distances between configurations.
//!
//! Configurations are compared position by position: both lists should assign the same
//! variables in the same order (use [Order::Index]). Extra literals of the longest list are ignored.

use crate::*;

pub trait DistanceFunction {
    fn compute_distance(&self, first: &LiteralList, second: &LiteralList) -> f64;

    fn name(&self) -> &str;
}

/// Jaccard distance between the sets of deselected variables
#[derive(Clone, Copy, Debug, Default)]
pub struct JaccardDeselectedDistance;

/// Number of positions with a different literal
#[derive(Clone, Copy, Debug, Default)]
pub struct HammingDistance;

impl DistanceFunction for JaccardDeselectedDistance {
    fn compute_distance(&self, first: &LiteralList, second: &LiteralList) -> f64 {
        let (mut both, mut union) = (0usize, 0usize);
        for (a, b) in first.iter().zip(second.iter()) {
            let (a, b) = (*a < 0, *b < 0);
            if a && b {
                both += 1;
            }
            if a || b {
                union += 1;
            }
        }
        match union {
            0 => 0.0,
            _ => 1.0 - both as f64 / union as f64,
        }
    }

    fn name(&self) -> &str {
        "JaccardDeselected"
    }
}

impl DistanceFunction for HammingDistance {
    fn compute_distance(&self, first: &LiteralList, second: &LiteralList) -> f64 {
        first.iter().zip(second.iter()).filter(|(a, b)| a != b).count() as f64
    }

    fn name(&self) -> &str {
        "Hamming"
    }
}
