//! Park-Miller "minimal standard" generator (MINSTD)
//!
//! A tiny deterministic generator so a maze seed always yields the same
//! maze on every platform, without pulling a full RNG crate into the core.
//!
//! - multiplier: 48271
//! - modulus: 2^31 - 1
//!
//! Reference: https://en.wikipedia.org/wiki/Lehmer_random_number_generator

const MULTIPLIER: u64 = 48271;
const MODULUS: u64 = 2_147_483_647;

#[derive(Debug, Clone)]
pub struct ParkMiller {
    state: u32,
}

impl ParkMiller {
    /// Seeds that reduce to 0 modulo 2^31 - 1 would lock the sequence at
    /// zero, so they are mapped to 1.
    pub fn new(seed: u32) -> Self {
        let state = (u64::from(seed) % MODULUS) as u32;
        Self {
            state: if state == 0 { 1 } else { state },
        }
    }

    fn advance(&mut self) -> u32 {
        self.state = ((u64::from(self.state) * MULTIPLIER) % MODULUS) as u32;
        self.state
    }

    /// Uniform-ish index in `0..len`. `len` must be non-zero.
    pub fn below(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        let value = u64::from(self.advance());
        ((value * len as u64) / MODULUS) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = ParkMiller::new(2918957128);
        let mut b = ParkMiller::new(2918957128);
        for _ in 0..100 {
            assert_eq!(a.below(1000), b.below(1000));
        }
    }

    #[test]
    fn test_degenerate_seeds() {
        for seed in [0, MODULUS as u32] {
            let mut rng = ParkMiller::new(seed);
            assert_eq!(rng.state, 1);
            rng.below(10);
            assert_ne!(rng.state, 0);
        }
    }

    #[test]
    fn test_below_range() {
        let mut rng = ParkMiller::new(54321);
        for len in 1..50 {
            for _ in 0..20 {
                assert!(rng.below(len) < len);
            }
        }
    }

    #[test]
    fn test_known_first_value() {
        // 1 * 48271 mod (2^31 - 1)
        let mut rng = ParkMiller::new(1);
        assert_eq!(rng.advance(), 48271);
    }
}
