//! Where things live inside decoded chunk and entity trees.
//!
//! The layout changed several times between game versions, so every concept
//! has a list of alternative key paths. They are tried in order and the first
//! one that resolves to the expected type wins. Newer layouts come first.

use crate::{
	math::bit::PackingMode,
	nbt::{
		Tag,
		ListTag,
		lookup::{first_map, TagPath},
	},
};

/// First `DataVersion` where packed indices never straddle a word (20w17a).
pub const PADDED_PACKING_VERSION: i32 = 2529;

pub const DATA_VERSION: &[TagPath<'static>] = &[&["DataVersion"]];

pub const CHUNK_X: &[TagPath<'static>] = &[&["xPos"], &["Level", "xPos"]];
pub const CHUNK_Z: &[TagPath<'static>] = &[&["zPos"], &["Level", "zPos"]];

pub const SECTIONS: &[TagPath<'static>] = &[&["sections"], &["Level", "Sections"]];

// Relative to a section.
pub const SECTION_Y: &[TagPath<'static>] = &[&["Y"]];
pub const PALETTE: &[TagPath<'static>] = &[&["block_states", "palette"], &["Palette"]];
pub const BLOCK_DATA: &[TagPath<'static>] = &[&["block_states", "data"], &["BlockStates"]];

pub const STRUCTURE_STARTS: &[TagPath<'static>] = &[
	&["structures", "starts"],
	&["Level", "Structures", "Starts"],
	&["Structures", "Starts"],
];

pub const BLOCK_ENTITIES: &[TagPath<'static>] = &[&["block_entities"], &["Level", "TileEntities"]];

// Relative to a structure start.
pub const START_ID: &[TagPath<'static>] = &[&["id"]];
pub const START_CHUNK_X: &[TagPath<'static>] = &[&["ChunkX"]];
pub const START_CHUNK_Z: &[TagPath<'static>] = &[&["ChunkZ"]];

// Relative to a block entity.
pub const BLOCK_ENTITY_ID: &[TagPath<'static>] = &[&["id"]];
pub const SPAWNER_ENTITY: &[TagPath<'static>] = &[
	&["SpawnData", "entity", "id"],
	&["SpawnData", "id"],
	&["EntityId"],
];

pub fn int(tag: &Tag, paths: &[TagPath<'_>]) -> Option<i32> {
	first_map(tag, paths, Tag::as_i32)
}

pub fn string<'a>(tag: &'a Tag, paths: &[TagPath<'_>]) -> Option<&'a str> {
	first_map(tag, paths, Tag::as_str)
}

pub fn list<'a>(tag: &'a Tag, paths: &[TagPath<'_>]) -> Option<&'a ListTag> {
	first_map(tag, paths, Tag::as_list)
}

pub fn long_array<'a>(tag: &'a Tag, paths: &[TagPath<'_>]) -> Option<&'a [i64]> {
	first_map(tag, paths, Tag::as_long_array)
}

pub fn data_version(chunk: &Tag) -> Option<i32> {
	int(chunk, DATA_VERSION)
}

/// Absolute chunk coordinates stored in the chunk itself.
pub fn chunk_position(chunk: &Tag) -> Option<(i32, i32)> {
	Some((int(chunk, CHUNK_X)?, int(chunk, CHUNK_Z)?))
}

/// Packing used by the chunk's block data.
/// Chunks without a `DataVersion` predate palettes entirely, so the default
/// only matters for hand-made data.
pub fn packing_mode(chunk: &Tag) -> PackingMode {
	match data_version(chunk) {
		Some(version) if version < PADDED_PACKING_VERSION => PackingMode::Spanning,
		_ => PackingMode::Padded,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::compound;
	use crate::nbt::testutil::compound_list;

	#[test]
	fn newer_layout_first() {
		let chunk = compound! {
			("xPos", 4i32),
			("zPos", -2i32),
			("Level", compound! {
				("xPos", 9i32),
				("zPos", 9i32),
			}),
		};
		assert_eq!(chunk_position(&chunk), Some((4, -2)));
	}

	#[test]
	fn older_layout_fallback() {
		let chunk = compound! {
			("DataVersion", 1976i32),
			("Level", compound! {
				("xPos", 9i32),
				("zPos", 10i32),
				("Sections", compound_list(vec![compound! { ("Y", 0i8) }])),
			}),
		};
		assert_eq!(chunk_position(&chunk), Some((9, 10)));
		assert_eq!(list(&chunk, SECTIONS).map(ListTag::len), Some(1));
		assert_eq!(packing_mode(&chunk), PackingMode::Spanning);
	}

	#[test]
	fn packing_by_version() {
		assert_eq!(packing_mode(&compound! { ("DataVersion", 2529i32) }), PackingMode::Padded);
		assert_eq!(packing_mode(&compound! { ("DataVersion", 2528i32) }), PackingMode::Spanning);
		assert_eq!(packing_mode(&compound!()), PackingMode::Padded);
	}
}
