//! Deterministic random source.
//!
//! Nothing in a run may use a platform RNG. All randomness, including any
//! an action needs, is drawn from one [`Prng`] in a fixed call order, so a
//! seed fully determines the run.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::fmt;

/// Seed for a [`Prng`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seed {
    /// Free-form text seed, hashed into the generator's 256-bit seed.
    Text(String),
    /// Numeric seed.
    Number(u64),
}

impl From<&str> for Seed {
    fn from(seed: &str) -> Self {
        Seed::Text(seed.to_string())
    }
}

impl From<String> for Seed {
    fn from(seed: String) -> Self {
        Seed::Text(seed)
    }
}

impl From<u64> for Seed {
    fn from(seed: u64) -> Self {
        Seed::Number(seed)
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seed::Text(text) => write!(f, "{:?}", text),
            Seed::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Seeded ChaCha8 generator with the draw primitives the runner relies on.
///
/// ChaCha8's output stream is specified independently of platform and
/// word size, so a seed yields the same sequence everywhere.
pub struct Prng {
    rng: ChaCha8Rng,
    /// Number of raw draws taken so far.
    draws: u64,
}

impl Prng {
    /// Create a generator from a text or numeric seed.
    pub fn new(seed: impl Into<Seed>) -> Self {
        let rng = match seed.into() {
            Seed::Text(text) => ChaCha8Rng::from_seed(*blake3::hash(text.as_bytes()).as_bytes()),
            Seed::Number(n) => ChaCha8Rng::seed_from_u64(n),
        };
        Self { rng, draws: 0 }
    }

    /// Uniform float in `[0, 1)` from one draw.
    pub fn next_float(&mut self) -> f64 {
        let bits = self.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// `true` with probability `p`, using exactly one draw.
    ///
    /// `p <= 0` is never true and `p >= 1` is always true, but the draw is
    /// taken either way so the stream does not depend on `p`.
    pub fn weighted_bool(&mut self, p: f64) -> bool {
        self.next_float() < p
    }

    /// Uniform permutation of `0..n` (Fisher–Yates, `n - 1` draws).
    pub fn permutation(&mut self, n: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..n).collect();
        for i in (1..n).rev() {
            let j = (self.next_float() * (i + 1) as f64) as usize;
            indices.swap(i, j.min(i));
        }
        indices
    }

    /// Number of raw draws taken since construction.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl RngCore for Prng {
    fn next_u32(&mut self) -> u32 {
        self.draws += 1;
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws += 1;
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws += 1;
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws += 1;
        self.rng.try_fill_bytes(dest)
    }
}

impl fmt::Debug for Prng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prng").field("draws", &self.draws).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::collections::HashSet;

    fn sample(prng: &mut Prng) -> Vec<u64> {
        (0..16).map(|_| prng.next_u64()).collect()
    }

    #[test]
    fn test_same_text_seed_same_stream() {
        let mut a = Prng::new("test-seed");
        let mut b = Prng::new(String::from("test-seed"));
        assert_eq!(sample(&mut a), sample(&mut b));
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = Prng::new("s1");
        let mut b = Prng::new("s2");
        let mut c = Prng::new(1u64);
        let first = sample(&mut a);
        assert_ne!(first, sample(&mut b));
        assert_ne!(first, sample(&mut c));
    }

    #[test]
    fn test_numeric_seed_is_reproducible() {
        let mut a = Prng::new(12345u64);
        let mut b = Prng::new(12345u64);
        assert_eq!(sample(&mut a), sample(&mut b));
    }

    #[test]
    fn test_next_float_in_unit_interval() {
        let mut prng = Prng::new("unit");
        for _ in 0..10_000 {
            let x = prng.next_float();
            assert!((0.0..1.0).contains(&x), "{} out of range", x);
        }
    }

    #[test]
    fn test_weighted_bool_takes_exactly_one_draw() {
        let mut prng = Prng::new("draws");
        for p in [0.0, 0.25, 1.0, -3.0, 7.0] {
            let before = prng.draws();
            prng.weighted_bool(p);
            assert_eq!(prng.draws(), before + 1, "p = {}", p);
        }
    }

    #[test]
    fn test_weighted_bool_extremes() {
        let mut prng = Prng::new("extremes");
        for _ in 0..1_000 {
            assert!(prng.weighted_bool(1.0));
            assert!(!prng.weighted_bool(0.0));
        }
    }

    #[test]
    fn test_weighted_bool_matches_next_float_stream() {
        // A weighted draw must consume the same stream position as next_float.
        let mut a = Prng::new("aligned");
        let mut b = Prng::new("aligned");
        for _ in 0..100 {
            let x = a.next_float();
            assert_eq!(b.weighted_bool(0.5), x < 0.5);
        }
    }

    #[test]
    fn test_permutation_draw_count() {
        let mut prng = Prng::new("perm");
        for n in 0..10usize {
            let before = prng.draws();
            prng.permutation(n);
            assert_eq!(prng.draws() - before, n.saturating_sub(1) as u64, "n = {}", n);
        }
    }

    #[test]
    fn test_permutation_is_a_permutation() {
        let mut prng = Prng::new("perm");
        for _ in 0..100 {
            let perm = prng.permutation(12);
            let unique: HashSet<_> = perm.iter().copied().collect();
            assert_eq!(perm.len(), 12);
            assert_eq!(unique.len(), 12);
            assert!(perm.iter().all(|&i| i < 12));
        }
    }

    #[test]
    fn test_permutation_reaches_every_ordering_of_three() {
        let mut prng = Prng::new("coverage");
        let seen: HashSet<Vec<usize>> = (0..500).map(|_| prng.permutation(3)).collect();
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn test_rng_facade_counts_draws() {
        let mut prng = Prng::new("facade");
        let value: u32 = prng.gen_range(0..100);
        assert!(value < 100);
        assert!(prng.draws() >= 1);
    }
}
