//! Deterministic Random Number Generator
//!
//! Uses Xorshift128+ algorithm for fast, high-quality, deterministic randomness.
//! Given the same seed, produces identical sequence on all platforms.

use serde::{Deserialize, Serialize};

use super::vec2::Vec2;

/// Deterministic PRNG using Xorshift128+ algorithm.
///
/// # Determinism Guarantee
///
/// Given the same seed, this RNG will produce the exact same sequence
/// of random numbers on any platform.
///
/// # Example
///
/// ```
/// use carrom::core::rng::DeterministicRng;
///
/// let mut rng = DeterministicRng::new(12345);
/// let value = rng.next_u64();
/// assert_eq!(value, 6233086606872742541); // Always the same!
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeterministicRng {
    state: [u64; 2],
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(0)
    }
}

impl DeterministicRng {
    /// Create a new RNG from a 64-bit seed.
    ///
    /// Uses SplitMix64 to initialize the internal state, ensuring
    /// good distribution even from weak seeds.
    pub fn new(seed: u64) -> Self {
        let mut s = seed;
        let state0 = splitmix64(&mut s);
        let state1 = splitmix64(&mut s);

        // Ensure state is never all zeros
        let state = if state0 == 0 && state1 == 0 {
            [1, 1]
        } else {
            [state0, state1]
        };

        Self { state }
    }

    /// Generate the next 64-bit random value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.state[0];
        let mut s1 = self.state[1];
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.state[0] = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.state[1] = s1.rotate_left(37);

        result
    }

    /// Generate a random f64 in range [0, 1).
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        // 53 high bits give a uniform double in [0, 1)
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Generate a random f64 in range [min, max).
    #[inline]
    pub fn next_f64_range(&mut self, min: f64, max: f64) -> f64 {
        if min >= max {
            return min;
        }
        min + self.next_f64() * (max - min)
    }

    /// Generate a random point in the disc of the given radius around a center.
    ///
    /// Sampled as a random angle and a random distance, matching the
    /// placement behavior the turn rules expect for returned coins.
    pub fn random_point_in_disc(&mut self, center: Vec2, radius: f64) -> Vec2 {
        let angle = self.next_f64_range(0.0, std::f64::consts::TAU);
        let distance = self.next_f64_range(0.0, radius);
        center + Vec2::from_angle(angle) * distance
    }

    /// Get current state (for checkpointing/debugging).
    pub fn state(&self) -> [u64; 2] {
        self.state
    }

    /// Restore from saved state.
    pub fn set_state(&mut self, state: [u64; 2]) {
        self.state = state;
    }
}

/// SplitMix64 for seed initialization.
/// Produces well-distributed values from sequential seeds.
#[inline]
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_determinism() {
        // Same seed must produce same sequence
        let mut rng1 = DeterministicRng::new(12345);
        let mut rng2 = DeterministicRng::new(12345);

        for _ in 0..1000 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        // Different seeds produce different sequences
        let mut rng1 = DeterministicRng::new(12345);
        let mut rng2 = DeterministicRng::new(54321);

        // Very unlikely to match
        assert_ne!(rng1.next_u64(), rng2.next_u64());
    }

    #[test]
    fn test_rng_known_values() {
        // Verify specific output for regression testing
        let mut rng = DeterministicRng::new(42);
        let val1 = rng.next_u64();
        let val2 = rng.next_u64();
        let val3 = rng.next_u64();

        // These values must never change!
        // If they do, saved games seeded before the change will diverge.
        assert_eq!(val1, 16629283624882167704);
        assert_eq!(val2, 1420492921613871959);
        assert_eq!(val3, 9768315062676884790);
    }

    #[test]
    fn test_next_f64_range() {
        let mut rng = DeterministicRng::new(5678);

        for _ in 0..1000 {
            let val = rng.next_f64_range(-10.0, 10.0);
            assert!((-10.0..10.0).contains(&val));
        }

        // Edge case: min = max
        assert_eq!(rng.next_f64_range(5.0, 5.0), 5.0);
    }

    #[test]
    fn test_next_f64_unit_interval() {
        let mut rng = DeterministicRng::new(9999);

        for _ in 0..1000 {
            let val = rng.next_f64();
            assert!((0.0..1.0).contains(&val));
        }
    }

    #[test]
    fn test_random_point_in_disc() {
        let mut rng = DeterministicRng::new(7777);
        let center = Vec2::new(300.0, 300.0);

        for _ in 0..100 {
            let p = rng.random_point_in_disc(center, 60.0);
            assert!(p.distance(center) <= 60.0 + 1e-9);
        }
    }

    #[test]
    fn test_state_checkpoint() {
        let mut rng = DeterministicRng::new(5555);

        // Advance some
        for _ in 0..50 {
            rng.next_u64();
        }

        // Save state
        let saved_state = rng.state();

        // Advance more
        let next_values: Vec<u64> = (0..10).map(|_| rng.next_u64()).collect();

        // Restore state
        rng.set_state(saved_state);

        // Should produce same values again
        for expected in next_values {
            assert_eq!(rng.next_u64(), expected);
        }
    }
}
