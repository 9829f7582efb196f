//! Rendering a region file into a 512x512 RGB tile.

use std::fmt::Debug;

use log::debug;

use crate::world::{
	chunk::{chunk_sections, extract_top_surface, CHUNK_WIDTH},
	io::region::RegionContainer,
	schema,
};

use super::colors::{block_color, Rgb, BACKGROUND};
use super::hillshade::{apply_hillshade, HeightField};

/// Pixels along one edge of a tile: 32 chunks of 16 blocks.
pub const TILE_SIZE: usize = 512;
/// Length of [Tile::as_bytes].
pub const TILE_BYTES: usize = TILE_SIZE * TILE_SIZE * 3;

/// A 512x512 RGB raster, row-major.
#[derive(Clone, PartialEq, Eq)]
pub struct Tile {
	pixels: Vec<Rgb>,
}

impl Tile {
	/// A tile filled with the background color.
	pub fn new() -> Self {
		Self::filled(BACKGROUND)
	}

	pub fn filled(color: Rgb) -> Self {
		Self {
			pixels: vec![color; TILE_SIZE * TILE_SIZE],
		}
	}

	pub fn get(&self, x: usize, z: usize) -> Rgb {
		self.pixels[z * TILE_SIZE + x]
	}

	pub fn set(&mut self, x: usize, z: usize, color: Rgb) {
		self.pixels[z * TILE_SIZE + x] = color;
	}

	pub fn pixels(&self) -> &[Rgb] {
		&self.pixels
	}

	pub fn pixels_mut(&mut self) -> &mut [Rgb] {
		&mut self.pixels
	}

	/// The raw `512 * 512 * 3` byte buffer, RGB interleaved.
	pub fn as_bytes(&self) -> &[u8] {
		bytemuck::cast_slice(&self.pixels)
	}

	pub fn into_bytes(self) -> Vec<u8> {
		self.as_bytes().to_vec()
	}
}

impl Default for Tile {
	fn default() -> Self {
		Self::new()
	}
}

impl Debug for Tile {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Tile({TILE_SIZE}x{TILE_SIZE})")
	}
}

/// Renders the top surface of every chunk in a region file.
///
/// Chunks that are absent or fail to decode stay background. A buffer that
/// isn't a region file at all gives a background tile.
pub fn render_region_tile(bytes: &[u8]) -> Tile {
	let mut tile = Tile::new();
	let mut heights = HeightField::new(TILE_SIZE);
	let region = match RegionContainer::open(bytes) {
		Ok(region) => region,
		Err(err) => {
			debug!("Rendering empty tile: {err}");
			return tile;
		}
	};
	for slot in region.present_chunks() {
		let Some(chunk) = slot.decode() else {
			continue;
		};
		let chunk = chunk.tag();
		let sections = chunk_sections(chunk);
		let surface = extract_top_surface(&sections, schema::packing_mode(chunk));
		let origin_x = slot.x() as usize * CHUNK_WIDTH;
		let origin_z = slot.z() as usize * CHUNK_WIDTH;
		for (column, cell) in surface.iter().enumerate() {
			let Some(cell) = cell else {
				continue;
			};
			let x = origin_x + column % CHUNK_WIDTH;
			let z = origin_z + column / CHUNK_WIDTH;
			tile.set(x, z, block_color(cell.block));
			heights.set(x, z, cell.height);
		}
	}
	apply_hillshade(&mut tile, &heights);
	tile
}
