//! The parts of `level.dat` the map cares about.

use std::path::Path;

use crate::{
	MapResult, MapError,
	nbt::{
		self,
		Tag,
		lookup::{get_path, first_map, TagPath},
	},
};

use super::features::PointMarker;

const LEVEL_NAME: &[TagPath<'static>] = &[&["Data", "LevelName"]];
const SEED: &[TagPath<'static>] = &[
	&["Data", "WorldGenSettings", "seed"],
	&["Data", "RandomSeed"],
];
const SPAWN_POS: &[TagPath<'static>] = &[&["Data", "spawn", "pos"]];

/// Summary of a world's `level.dat`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LevelInfo {
	pub name: Option<String>,
	pub seed: Option<i64>,
	pub spawn: Option<PointMarker>,
}

impl LevelInfo {
	/// Reads `level.dat`. The file is gzip compressed in practice but any
	/// supported framing is accepted.
	pub fn read<P: AsRef<Path>>(path: P) -> MapResult<Self> {
		let root = nbt::read_file(path)?;
		Self::from_tag(root.tag())
	}

	pub fn from_tag(root: &Tag) -> MapResult<Self> {
		if get_path(root, &["Data"]).and_then(Tag::as_compound).is_none() {
			return MapError::malformed("level.dat has no Data compound");
		}
		Ok(Self {
			name: first_map(root, LEVEL_NAME, Tag::as_str).map(str::to_owned),
			seed: first_map(root, SEED, Tag::as_i64),
			spawn: world_spawn(root),
		})
	}
}

/// The world spawn point. Older worlds store `SpawnX`/`SpawnY`/`SpawnZ`,
/// newer ones a `spawn` compound with a `pos` int array.
fn world_spawn(root: &Tag) -> Option<PointMarker> {
	if let Some(spawn) = first_map(root, SPAWN_POS, PointMarker::from_tag) {
		return Some(spawn);
	}
	let axis = |key: &str| get_path(root, &["Data", key]).and_then(Tag::as_f64);
	Some(PointMarker::new(axis("SpawnX")?, axis("SpawnY")?, axis("SpawnZ")?))
}
