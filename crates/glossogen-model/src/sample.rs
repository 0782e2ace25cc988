//! Shared random-draw helpers.
//!
//! One seeded generator drives the whole simulation, and the draw order is
//! part of the observable contract: waiting time first, then event type,
//! then node/position selection. Everything here takes the generator as an
//! explicit argument so callers control that order.

use rand::Rng;
use rand::seq::SliceRandom;

/// Draw a waiting time from Exponential(`rate`) by inverse transform.
///
/// Rate (not scale) parametrization: the mean is `1 / rate`. A zero or
/// negative rate means the event can never fire, so the waiting time is
/// positive infinity and the caller's clock runs off the end of the tree.
pub fn next_exponential<R: Rng>(rng: &mut R, rate: f64) -> f64 {
    if rate <= 0.0 {
        return f64::INFINITY;
    }
    let u: f64 = rng.random();
    -(1.0 - u).ln() / rate
}

/// Draw an index from a categorical distribution over `weights`.
///
/// Weights need not be normalized. Returns `None` when the total weight is
/// zero or not finite (no event can be chosen). A draw that lands past the
/// last cumulative boundary through floating-point rounding selects the last
/// positively-weighted entry.
pub fn categorical<R: Rng>(rng: &mut R, weights: &[f64]) -> Option<usize> {
    let total: f64 = weights.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return None;
    }

    let roll = rng.random::<f64>() * total;
    let mut cumulative = 0.0;
    let mut last_positive = None;
    for (index, &weight) in weights.iter().enumerate() {
        if weight > 0.0 {
            last_positive = Some(index);
        }
        cumulative += weight;
        if roll < cumulative {
            return Some(index);
        }
    }
    last_positive
}

/// Return `0..len` in a uniformly random permutation order.
///
/// Used by the borrowing scan, which examines trait positions in random
/// order and copies the first eligible one.
pub fn shuffled_indices<R: Rng>(rng: &mut R, len: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..len).collect();
    indices.shuffle(rng);
    indices
}

/// Pick a uniformly random element of `items`, or `None` if empty.
pub fn pick_uniform<'a, T, R: Rng>(rng: &mut R, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.random_range(0..items.len()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn exponential_is_positive_and_reproducible() {
        let mut rng_a = SmallRng::seed_from_u64(5);
        let mut rng_b = SmallRng::seed_from_u64(5);
        for _ in 0..100 {
            let a = next_exponential(&mut rng_a, 0.5);
            let b = next_exponential(&mut rng_b, 0.5);
            assert!(a >= 0.0);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn exponential_zero_rate_is_infinite() {
        let mut rng = SmallRng::seed_from_u64(5);
        assert!(next_exponential(&mut rng, 0.0).is_infinite());
    }

    #[test]
    fn exponential_mean_tracks_rate() {
        let mut rng = SmallRng::seed_from_u64(17);
        let n = 20_000;
        let sum: f64 = (0..n).map(|_| next_exponential(&mut rng, 2.0)).sum();
        let mean = sum / f64::from(n);
        // Mean of Exponential(2) is 0.5; allow generous sampling error.
        assert!((mean - 0.5).abs() < 0.05, "mean was {mean}");
    }

    #[test]
    fn categorical_respects_zero_weights() {
        let mut rng = SmallRng::seed_from_u64(3);
        for _ in 0..1000 {
            let choice = categorical(&mut rng, &[0.0, 1.0, 0.0]).unwrap();
            assert_eq!(choice, 1);
        }
    }

    #[test]
    fn categorical_zero_total_is_none() {
        let mut rng = SmallRng::seed_from_u64(3);
        assert!(categorical(&mut rng, &[0.0, 0.0]).is_none());
        assert!(categorical(&mut rng, &[]).is_none());
    }

    #[test]
    fn categorical_roughly_proportional() {
        let mut rng = SmallRng::seed_from_u64(23);
        let mut counts = [0_u32; 2];
        for _ in 0..10_000 {
            let choice = categorical(&mut rng, &[3.0, 1.0]).unwrap();
            if let Some(count) = counts.get_mut(choice) {
                *count += 1;
            }
        }
        // Expect ~7500 / ~2500.
        assert!(counts[0] > 7000 && counts[0] < 8000, "counts: {counts:?}");
    }

    #[test]
    fn shuffled_indices_is_a_permutation() {
        let mut rng = SmallRng::seed_from_u64(9);
        let mut indices = shuffled_indices(&mut rng, 20);
        indices.sort_unstable();
        assert_eq!(indices, (0..20).collect::<Vec<usize>>());
    }

    #[test]
    fn pick_uniform_empty_is_none() {
        let mut rng = SmallRng::seed_from_u64(1);
        let empty: [u8; 0] = [];
        assert!(pick_uniform(&mut rng, &empty).is_none());
    }
}
