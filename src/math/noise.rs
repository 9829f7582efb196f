//! Seeded value noise and fractal sums of it.
//!
//! Everything here is a pure function of its inputs. The same seed and
//! coordinates always give bit-identical results.

pub const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
pub const FNV_PRIME: u32 = 16_777_619;

/// 32-bit FNV-1a.
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
	bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
		(hash ^ *byte as u32).wrapping_mul(FNV_PRIME)
	})
}

/// Folds a seed string into the integer seed used by the noise fields.
pub fn seed_hash(seed: &str) -> u32 {
	fnv1a_32(seed.as_bytes())
}

/// Mixes a seed and a lattice point into 64 well distributed bits.
pub fn hash_u64(seed: u32, x: i32, z: i32) -> u64 {
	let mut v = (seed as u64).wrapping_mul(0xD6E8_FEB8_6659_FD93)
		^ (x as i64 as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
		^ (z as i64 as u64).wrapping_mul(0x94D0_49BB_1331_11EB);
	v ^= v >> 30;
	v = v.wrapping_mul(0xBF58_476D_1CE4_E5B9);
	v ^= v >> 27;
	v = v.wrapping_mul(0x94D0_49BB_1331_11EB);
	v ^ (v >> 31)
}

/// Lattice value in `[0, 1]`.
pub fn hash01(seed: u32, x: i32, z: i32) -> f64 {
	// Top 53 bits so the division is exact.
	(hash_u64(seed, x, z) >> 11) as f64 / ((1u64 << 53) - 1) as f64
}

pub fn smoothstep(t: f64) -> f64 {
	let t = t.clamp(0.0, 1.0);
	t * t * (3.0 - 2.0 * t)
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
	a + (b - a) * t
}

/// Smoothly interpolated lattice noise in `[0, 1]`.
pub fn value_noise_2d(seed: u32, x: f64, z: f64) -> f64 {
	let x0 = x.floor();
	let z0 = z.floor();
	let tx = smoothstep(x - x0);
	let tz = smoothstep(z - z0);
	let xi = x0 as i32;
	let zi = z0 as i32;

	let v00 = hash01(seed, xi, zi);
	let v10 = hash01(seed, xi.wrapping_add(1), zi);
	let v01 = hash01(seed, xi, zi.wrapping_add(1));
	let v11 = hash01(seed, xi.wrapping_add(1), zi.wrapping_add(1));

	let a = lerp(v00, v10, tx);
	let b = lerp(v01, v11, tx);
	lerp(a, b, tz)
}

/// Fractal Brownian motion: octaves of [value_noise_2d] at doubling
/// frequency and halving amplitude, normalized back into `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fbm {
	pub seed: u32,
	pub octaves: u32,
	/// Lattice cells per block for the first octave.
	pub frequency: f64,
}

impl Fbm {
	pub const fn new(seed: u32, octaves: u32, frequency: f64) -> Self {
		Self { seed, octaves, frequency }
	}

	pub fn sample(&self, x: f64, z: f64) -> f64 {
		let mut amplitude = 1.0;
		let mut frequency = self.frequency;
		let mut sum = 0.0;
		let mut norm = 0.0;
		for octave in 0..self.octaves {
			// Each octave gets its own lattice so they don't line up at the origin.
			let seed = self.seed.wrapping_add(octave.wrapping_mul(0x9E37_79B9));
			sum += amplitude * value_noise_2d(seed, x * frequency, z * frequency);
			norm += amplitude;
			amplitude *= 0.5;
			frequency *= 2.0;
		}
		if norm == 0.0 {
			return 0.0;
		}
		(sum / norm).clamp(0.0, 1.0)
	}
}
