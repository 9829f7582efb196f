//! Unpacking paletted sections into a chunk's top surface.

use log::debug;

use crate::{
	break_if,
	continue_if,
	MapResult, MapError,
	math::bit::*,
	nbt::{
		Tag,
		tagtype::Compound,
		lookup::first_map_in,
	},
};

use super::blockstate::BlockState;
use super::schema;

/// Blocks along one edge of a chunk.
pub const CHUNK_WIDTH: usize = 16;
/// Columns in a chunk.
pub const CHUNK_COLUMNS: usize = CHUNK_WIDTH * CHUNK_WIDTH;
/// Blocks in a 16x16x16 section.
pub const SECTION_VOLUME: usize = CHUNK_COLUMNS * CHUNK_WIDTH;

/// A 16x16x16 slice of a chunk.
#[derive(Debug, Clone)]
pub struct Section<'a> {
	/// Signed section index. Block Y = `y * 16 + local_y`.
	pub y: i32,
	pub palette: Vec<BlockState>,
	/// Packed palette indices. Absent when the palette has a single entry.
	pub data: Option<&'a [i64]>,
}

impl<'a> Section<'a> {
	/// Decodes a section tag. See [Section::from_map].
	pub fn from_tag(tag: &'a Tag) -> MapResult<Option<Self>> {
		match tag.as_compound() {
			Some(map) => Self::from_map(map),
			None => MapError::malformed("section is not a compound"),
		}
	}

	/// Decodes a section compound.
	/// Returns `Ok(None)` for sections without block data (lighting-only
	/// sections above and below the world).
	pub fn from_map(map: &'a Compound) -> MapResult<Option<Self>> {
		let Some(y) = first_map_in(map, schema::SECTION_Y, Tag::as_i32) else {
			return MapError::malformed("section without a Y index");
		};
		if top_of_section(y).is_none() {
			return MapError::malformed(format!("section Y {y} is out of range"));
		}
		let Some(palette) = first_map_in(map, schema::PALETTE, Tag::as_list) else {
			return Ok(None);
		};
		let palette = palette.compounds()
			.iter()
			.map(BlockState::try_from_compound)
			.collect::<MapResult<Vec<_>>>()?;
		if palette.is_empty() {
			return Ok(None);
		}
		Ok(Some(Self {
			y,
			palette,
			data: first_map_in(map, schema::BLOCK_DATA, Tag::as_long_array),
		}))
	}

	/// Y of the lowest block in the section.
	pub fn base_y(&self) -> i32 {
		self.y.saturating_mul(CHUNK_WIDTH as i32)
	}

	/// The palette entry at block `index` (`y * 256 + z * 16 + x`).
	/// `None` if the index data is missing or points past the palette.
	pub fn block_at(&self, index: usize, mode: PackingMode) -> Option<&BlockState> {
		if self.palette.len() == 1 {
			return self.palette.first();
		}
		let words = as_unsigned_words(self.data?);
		let bits = bits_per_entry(self.palette.len());
		let palette_index = extract_packed(words, bits, index, mode)?;
		self.palette.get(palette_index as usize)
	}
}

/// Y of the highest block in section `y`, if block heights fit an `i32`.
fn top_of_section(y: i32) -> Option<i32> {
	y.checked_mul(CHUNK_WIDTH as i32)?.checked_add(CHUNK_WIDTH as i32 - 1)
}

/// Collects every section of a chunk that carries block data.
/// Broken sections are skipped, the rest of the chunk still counts.
pub fn chunk_sections(chunk: &Tag) -> Vec<Section<'_>> {
	let Some(list) = schema::list(chunk, schema::SECTIONS) else {
		return Vec::new();
	};
	list.compounds()
		.iter()
		.filter_map(|section| match Section::from_map(section) {
			Ok(section) => section,
			Err(err) => {
				debug!("Skipping section: {err}");
				None
			}
		})
		.collect()
}

/// The topmost non-air block of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceCell<'a> {
	pub block: &'a BlockState,
	pub height: i32,
}

/// 256 columns indexed `z * 16 + x`. `None` means no solid block was found.
pub type SurfaceMap<'a> = [Option<SurfaceCell<'a>>; CHUNK_COLUMNS];

/// Finds the topmost non-air block of every column.
///
/// Sections are scanned from the highest down and scanning stops as soon
/// as every column is resolved. A single-entry palette fills the whole
/// section without looking at any packed data.
pub fn extract_top_surface<'s>(sections: &'s [Section<'_>], mode: PackingMode) -> SurfaceMap<'s> {
	let mut surface: SurfaceMap<'s> = [None; CHUNK_COLUMNS];
	let mut remaining = CHUNK_COLUMNS;
	let mut order: Vec<&'s Section<'_>> = sections.iter().collect();
	order.sort_by(|a, b| b.y.cmp(&a.y));
	for section in order {
		break_if!(remaining == 0);
		if section.palette.len() == 1 {
			let block = &section.palette[0];
			continue_if!(block.is_air());
			let height = section.base_y().saturating_add(15);
			for cell in surface.iter_mut().filter(|cell| cell.is_none()) {
				*cell = Some(SurfaceCell { block, height });
			}
			remaining = 0;
			continue;
		}
		continue_if!(section.data.is_none());
		for local_y in (0..CHUNK_WIDTH).rev() {
			break_if!(remaining == 0);
			let height = section.base_y().saturating_add(local_y as i32);
			for column in 0..CHUNK_COLUMNS {
				continue_if!(surface[column].is_some());
				let Some(block) = section.block_at(local_y * CHUNK_COLUMNS + column, mode) else {
					continue;
				};
				continue_if!(block.is_air());
				surface[column] = Some(SurfaceCell { block, height });
				remaining -= 1;
			}
		}
	}
	surface
}
