//! Approximate terrain drawn from nothing but the world seed.
//!
//! This does not reproduce the game's generator. It gives a plausible
//! looking map for regions that haven't been generated yet.

use crate::math::noise::{seed_hash, Fbm};

use super::colors::Rgb;
use super::tile::{Tile, TILE_SIZE};

/// Noise is evaluated on every `PREVIEW_STEP`th pixel and upscaled.
pub const PREVIEW_STEP: usize = 4;

pub const OCEAN_LEVEL: f64 = 0.38;
pub const BEACH_LEVEL: f64 = 0.42;
pub const MOUNTAIN_LEVEL: f64 = 0.62;
pub const SNOW_LEVEL: f64 = 0.72;

/// Coarse terrain classes of the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreviewBiome {
	Ocean,
	Beach,
	Mountain,
	Snow,
	Desert,
	Swamp,
	Forest,
	Tundra,
	Plains,
}

impl PreviewBiome {
	pub fn color(self) -> Rgb {
		match self {
			PreviewBiome::Ocean => [46, 82, 158],
			PreviewBiome::Beach => [222, 210, 160],
			PreviewBiome::Mountain => [122, 118, 112],
			PreviewBiome::Snow => [240, 244, 248],
			PreviewBiome::Desert => [214, 196, 128],
			PreviewBiome::Swamp => [72, 92, 56],
			PreviewBiome::Forest => [52, 110, 46],
			PreviewBiome::Tundra => [180, 196, 190],
			PreviewBiome::Plains => [110, 160, 72],
		}
	}
}

/// The four noise fields sampled per point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewSample {
	pub elevation: f64,
	pub temperature: f64,
	pub wetness: f64,
	pub ridge: f64,
}

impl PreviewSample {
	/// Elevation with ridges mixed in.
	pub fn height(&self) -> f64 {
		self.elevation * 0.85 + self.ridge * 0.15
	}

	pub fn classify(&self) -> PreviewBiome {
		let height = self.height();
		if height < OCEAN_LEVEL {
			return PreviewBiome::Ocean;
		}
		if height < BEACH_LEVEL {
			return PreviewBiome::Beach;
		}
		if height > SNOW_LEVEL {
			return PreviewBiome::Snow;
		}
		if height > MOUNTAIN_LEVEL {
			return PreviewBiome::Mountain;
		}
		match (self.temperature, self.wetness) {
			(t, w) if t > 0.6 && w < 0.4 => PreviewBiome::Desert,
			(t, w) if t > 0.45 && w > 0.62 => PreviewBiome::Swamp,
			(t, _) if t < 0.35 => PreviewBiome::Tundra,
			(_, w) if w > 0.5 => PreviewBiome::Forest,
			_ => PreviewBiome::Plains,
		}
	}
}

/// Seeded noise fields for one world.
#[derive(Debug, Clone, Copy)]
pub struct PreviewGenerator {
	elevation: Fbm,
	temperature: Fbm,
	wetness: Fbm,
	ridge: Fbm,
}

impl PreviewGenerator {
	pub fn new(seed: &str) -> Self {
		let seed = seed_hash(seed);
		Self {
			elevation: Fbm::new(seed, 5, 1.0 / 512.0),
			temperature: Fbm::new(seed ^ 0x5A5A_5A5A, 3, 1.0 / 1024.0),
			wetness: Fbm::new(seed ^ 0x3C3C_3C3C, 3, 1.0 / 768.0),
			ridge: Fbm::new(seed ^ 0x0F0F_0F0F, 4, 1.0 / 128.0),
		}
	}

	/// Samples every field at block coordinates.
	pub fn sample(&self, x: f64, z: f64) -> PreviewSample {
		PreviewSample {
			elevation: self.elevation.sample(x, z),
			temperature: self.temperature.sample(x, z),
			wetness: self.wetness.sample(x, z),
			ridge: self.ridge.sample(x, z),
		}
	}

	pub fn color_at(&self, x: f64, z: f64) -> Rgb {
		self.sample(x, z).classify().color()
	}

	/// Renders region `(region_x, region_z)`.
	pub fn render_tile(&self, region_x: i32, region_z: i32) -> Tile {
		let mut tile = Tile::new();
		let origin_x = region_x as f64 * TILE_SIZE as f64;
		let origin_z = region_z as f64 * TILE_SIZE as f64;
		for cell_z in (0..TILE_SIZE).step_by(PREVIEW_STEP) {
			for cell_x in (0..TILE_SIZE).step_by(PREVIEW_STEP) {
				let color = self.color_at(origin_x + cell_x as f64, origin_z + cell_z as f64);
				for z in cell_z..cell_z + PREVIEW_STEP {
					for x in cell_x..cell_x + PREVIEW_STEP {
						tile.set(x, z, color);
					}
				}
			}
		}
		tile
	}
}

/// Renders the seed preview of one region. Pure: the same arguments always
/// give the same bytes.
pub fn render_seed_preview_tile(seed: &str, region_x: i32, region_z: i32) -> Tile {
	PreviewGenerator::new(seed).render_tile(region_x, region_z)
}
