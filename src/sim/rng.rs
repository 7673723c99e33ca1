//! Seeded RNG for track generation
//!
//! A string seed is hashed into 128 bits which become the PCG state and
//! stream. Each generator owns its state; nothing is global.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Hash a string into four 32-bit words (cyrb128 mixing)
pub fn hash_seed(seed: &str) -> [u32; 4] {
    let mut h1: u32 = 1779033703;
    let mut h2: u32 = 3144134277;
    let mut h3: u32 = 1013904242;
    let mut h4: u32 = 2773480762;

    for unit in seed.encode_utf16() {
        let k = unit as u32;
        h1 = h2 ^ (h1 ^ k).wrapping_mul(597399067);
        h2 = h3 ^ (h2 ^ k).wrapping_mul(2869860233);
        h3 = h4 ^ (h3 ^ k).wrapping_mul(951274213);
        h4 = h1 ^ (h4 ^ k).wrapping_mul(2716044179);
    }

    h1 = (h3 ^ (h1 >> 18)).wrapping_mul(597399067);
    h2 = (h4 ^ (h2 >> 22)).wrapping_mul(2869860233);
    h3 = (h1 ^ (h3 >> 17)).wrapping_mul(951274213);
    h4 = (h2 ^ (h4 >> 19)).wrapping_mul(2716044179);

    h1 ^= h2 ^ h3 ^ h4;
    h2 ^= h1;
    h3 ^= h1;
    h4 ^= h1;
    [h1, h2, h3, h4]
}

/// Deterministic generator derived from a string seed
#[derive(Debug, Clone)]
pub struct TrackRng {
    inner: Pcg32,
}

impl TrackRng {
    pub fn from_seed_str(seed: &str) -> Self {
        let words = hash_seed(seed);
        let mut bytes = [0u8; 16];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(words) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        Self {
            inner: Pcg32::from_seed(bytes),
        }
    }

    /// Uniform float in [0, 1)
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        self.inner.random::<f32>()
    }

    /// Uniform float in [-1, 1)
    #[inline]
    pub fn next_signed(&mut self) -> f32 {
        self.next_f32() * 2.0 - 1.0
    }

    /// Uniform index in [0, upper), 0 when upper is 0
    pub fn next_index(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        ((self.next_f32() * upper as f32) as usize).min(upper - 1)
    }

    /// True with probability 0.5
    #[inline]
    pub fn coin(&mut self) -> bool {
        self.next_f32() < 0.5
    }
}
