//! 1D value noise used to vary track width

use super::rng::TrackRng;

/// Table size; the noise repeats with this period
pub const NOISE_TABLE_SIZE: usize = 512;

/// Smoothed value noise over a fixed random table
#[derive(Debug, Clone)]
pub struct ValueNoise1D {
    table: Box<[f32; NOISE_TABLE_SIZE]>,
}

impl ValueNoise1D {
    /// Fill the table with values in [-1, 1) drawn from `rng`
    pub fn new(rng: &mut TrackRng) -> Self {
        let mut table = Box::new([0.0; NOISE_TABLE_SIZE]);
        for v in table.iter_mut() {
            *v = rng.next_signed();
        }
        Self { table }
    }

    /// Sample at `x`, interpolating between neighbouring table entries
    pub fn sample(&self, x: f32) -> f32 {
        let floor = x.floor();
        let xi = (floor as i64).rem_euclid(NOISE_TABLE_SIZE as i64) as usize;
        let xf = x - floor;
        let v0 = self.table[xi];
        let v1 = self.table[(xi + 1) % NOISE_TABLE_SIZE];
        v0 + (v1 - v0) * fade(xf)
    }
}

/// Smoothstep 3t² - 2t³
#[inline]
fn fade(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noise() -> ValueNoise1D {
        ValueNoise1D::new(&mut TrackRng::from_seed_str("noise"))
    }

    #[test]
    fn test_bounded() {
        let n = noise();
        for i in 0..5000 {
            let v = n.sample(i as f32 * 0.173 - 300.0);
            assert!((-1.0..=1.0).contains(&v), "{v}");
        }
    }

    #[test]
    fn test_hits_table_at_integers() {
        let n = noise();
        assert_eq!(n.sample(3.0), n.table[3]);
        assert_eq!(n.sample(-1.0), n.table[NOISE_TABLE_SIZE - 1]);
    }

    #[test]
    fn test_periodic() {
        let n = noise();
        for i in 0..100 {
            let x = i as f32 * 0.37;
            let a = n.sample(x);
            let b = n.sample(x + NOISE_TABLE_SIZE as f32);
            assert!((a - b).abs() < 1e-3, "{a} vs {b}");
        }
    }

    #[test]
    fn test_deterministic() {
        let a = noise();
        let b = noise();
        for i in 0..100 {
            let x = i as f32 * 0.11;
            assert_eq!(a.sample(x).to_bits(), b.sample(x).to_bits());
        }
    }

    #[test]
    fn test_fade_endpoints() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(1.0), 1.0);
        assert_eq!(fade(0.5), 0.5);
    }
}
