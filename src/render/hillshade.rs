//! Relief shading from the height of the surface.

use super::colors::Rgb;
use super::tile::{Tile, TILE_SIZE};

/// Multiplier applied to the summed height deltas.
pub const SHADE_SCALE: i32 = 4;
/// Largest brightness change applied to a pixel, either way.
pub const MAX_SHADE: i32 = 25;

/// Surface height per pixel. `None` where no surface was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeightField {
	size: usize,
	heights: Vec<Option<i32>>,
}

impl HeightField {
	pub fn new(size: usize) -> Self {
		Self {
			size,
			heights: vec![None; size * size],
		}
	}

	pub fn get(&self, x: usize, z: usize) -> Option<i32> {
		self.heights[z * self.size + x]
	}

	pub fn set(&mut self, x: usize, z: usize, height: i32) {
		self.heights[z * self.size + x] = Some(height);
	}

	pub fn size(&self) -> usize {
		self.size
	}
}

/// Brightness change for a pixel at `height` given its left and upper
/// neighbors. A missing neighbor contributes nothing.
pub fn shade_delta(height: i32, left: Option<i32>, up: Option<i32>) -> i32 {
	let from_left = left.map_or(0, |left| height.saturating_sub(left));
	let from_up = up.map_or(0, |up| height.saturating_sub(up));
	from_left
		.saturating_add(from_up)
		.saturating_mul(SHADE_SCALE)
		.clamp(-MAX_SHADE, MAX_SHADE)
}

pub fn shade(color: Rgb, delta: i32) -> Rgb {
	color.map(|channel| (channel as i32 + delta).clamp(0, 255) as u8)
}

/// Shades every pixel that has a height. Pixels without one are untouched.
pub fn apply_hillshade(tile: &mut Tile, heights: &HeightField) {
	debug_assert_eq!(heights.size(), TILE_SIZE);
	for z in 0..TILE_SIZE {
		for x in 0..TILE_SIZE {
			let Some(height) = heights.get(x, z) else {
				continue;
			};
			let left = x.checked_sub(1).and_then(|left| heights.get(left, z));
			let up = z.checked_sub(1).and_then(|up| heights.get(x, up));
			let delta = shade_delta(height, left, up);
			if delta != 0 {
				tile.set(x, z, shade(tile.get(x, z), delta));
			}
		}
	}
}
