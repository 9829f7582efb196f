//! Structure, village and spawner markers found in region files.

use std::{
	collections::HashSet,
	path::{Path, PathBuf},
};

use log::{debug, warn};
use serde::Serialize;

use crate::{
	continue_if,
	MapResult,
	nbt::{
		Tag,
		lookup::{first_map, first_map_in},
	},
	world::io::region::RegionContainer,
};

use super::schema;

/// Block entity ids of mob spawners across versions.
pub const SPAWNER_IDS: [&str; 2] = ["minecraft:mob_spawner", "MobSpawner"];

/// Structure start ids that mark a start that never generated.
const INVALID_START: &str = "INVALID";

/// A point on the map, in block coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PointMarker {
	pub x: f64,
	pub y: f64,
	pub z: f64,
}

impl PointMarker {
	pub fn new(x: f64, y: f64, z: f64) -> Self {
		Self { x, y, z }
	}

	/// Reads three numbers from a list (`Pos`) or an int array (`pos`).
	pub fn from_tag(tag: &Tag) -> Option<Self> {
		match tag {
			Tag::List(list) => Some(Self::new(
				list.number_at(0)?,
				list.number_at(1)?,
				list.number_at(2)?,
			)),
			Tag::IntArray(array) if array.len() >= 3 => Some(Self::new(
				array[0] as f64,
				array[1] as f64,
				array[2] as f64,
			)),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureMarker {
	#[serde(rename = "type")]
	pub kind: String,
	pub label: String,
	pub x: i32,
	pub z: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpawnerMarker {
	pub x: i32,
	pub y: i32,
	pub z: i32,
	pub label: String,
}

/// Everything the feature scan found, ready to be serialized for overlays.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeatureMarkers {
	pub structures: Vec<StructureMarker>,
	pub villages: Vec<StructureMarker>,
	pub spawners: Vec<SpawnerMarker>,
}

impl FeatureMarkers {
	pub fn is_empty(&self) -> bool {
		self.structures.is_empty()
			&& self.villages.is_empty()
			&& self.spawners.is_empty()
	}
}

/// Turns `minecraft:village_plains` into `Village Plains`.
pub fn humanize_id(id: &str) -> String {
	let id = id.rsplit(':').next().unwrap_or(id);
	id.split(|c| c == '_' || c == '/')
		.filter(|word| !word.is_empty())
		.map(|word| {
			let mut chars = word.chars();
			match chars.next() {
				Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
				None => String::new(),
			}
		})
		.collect::<Vec<_>>()
		.join(" ")
}

/// Block coordinate of the middle of a chunk. `None` if it doesn't fit an `i32`.
fn chunk_centre(chunk: i32) -> Option<i32> {
	chunk.checked_mul(16)?.checked_add(8)
}

/// Accumulates markers over many chunks, dropping duplicates.
///
/// Structures that span several chunks are referenced from every chunk they
/// touch, so the same start is usually seen many times. Starts are keyed by
/// `(type, chunk x, chunk z)` and spawners by their rounded position.
#[derive(Debug, Default)]
pub struct FeatureCollector {
	markers: FeatureMarkers,
	seen_structures: HashSet<(String, i32, i32)>,
	seen_spawners: HashSet<(i32, i32, i32)>,
}

impl FeatureCollector {
	pub fn new() -> Self {
		Self::default()
	}

	/// Collects structure starts and spawners from one decoded chunk.
	pub fn add_chunk(&mut self, chunk: &Tag) {
		self.add_structure_starts(chunk);
		self.add_spawners(chunk);
	}

	fn add_structure_starts(&mut self, chunk: &Tag) {
		let Some(starts) = first_map(chunk, schema::STRUCTURE_STARTS, Tag::as_compound) else {
			return;
		};
		for (key, start) in starts.iter() {
			let Some(start) = start.as_compound() else {
				continue;
			};
			let kind = first_map_in(start, schema::START_ID, Tag::as_str).unwrap_or(key.as_str());
			continue_if!(kind == INVALID_START);
			let (Some(chunk_x), Some(chunk_z)) = (
				first_map_in(start, schema::START_CHUNK_X, Tag::as_i32),
				first_map_in(start, schema::START_CHUNK_Z, Tag::as_i32),
			) else {
				continue;
			};
			let (Some(x), Some(z)) = (chunk_centre(chunk_x), chunk_centre(chunk_z)) else {
				debug!("Skipping {kind} start at chunk ({chunk_x}, {chunk_z}): out of range");
				continue;
			};
			continue_if!(!self.seen_structures.insert((kind.to_owned(), chunk_x, chunk_z)));
			let marker = StructureMarker {
				kind: kind.to_owned(),
				label: humanize_id(kind),
				x,
				z,
			};
			if kind.to_ascii_lowercase().contains("village") {
				self.markers.villages.push(marker);
			} else {
				self.markers.structures.push(marker);
			}
		}
	}

	fn add_spawners(&mut self, chunk: &Tag) {
		let Some(entities) = schema::list(chunk, schema::BLOCK_ENTITIES) else {
			return;
		};
		for entity in entities.compounds() {
			let id = first_map_in(entity, schema::BLOCK_ENTITY_ID, Tag::as_str);
			continue_if!(!id.is_some_and(|id| SPAWNER_IDS.contains(&id)));
			let coord = |key: &str| entity.get(key).and_then(Tag::as_f64).map(|v| v.round() as i32);
			let (Some(x), Some(y), Some(z)) = (coord("x"), coord("y"), coord("z")) else {
				continue;
			};
			continue_if!(!self.seen_spawners.insert((x, y, z)));
			let label = first_map_in(entity, schema::SPAWNER_ENTITY, Tag::as_str)
				.map(humanize_id)
				.unwrap_or_else(|| String::from("Spawner"));
			self.markers.spawners.push(SpawnerMarker { x, y, z, label });
		}
	}

	/// Collects from every chunk in a region file held in memory.
	/// Chunks that fail to decode are skipped.
	pub fn add_region(&mut self, bytes: &[u8]) -> MapResult<()> {
		let region = RegionContainer::open(bytes)?;
		for slot in region.present_chunks() {
			if let Some(chunk) = slot.decode() {
				self.add_chunk(chunk.tag());
			}
		}
		Ok(())
	}

	pub fn add_region_file<P: AsRef<Path>>(&mut self, path: P) -> MapResult<()> {
		let bytes = std::fs::read(path.as_ref())?;
		self.add_region(&bytes)
	}

	/// Returns the markers sorted by position so output is stable.
	pub fn finish(self) -> FeatureMarkers {
		let mut markers = self.markers;
		markers.structures.sort_by(|a, b| (a.x, a.z, &a.kind).cmp(&(b.x, b.z, &b.kind)));
		markers.villages.sort_by(|a, b| (a.x, a.z, &a.kind).cmp(&(b.x, b.z, &b.kind)));
		markers.spawners.sort_by_key(|s| (s.x, s.y, s.z));
		markers
	}
}

/// Scans a set of region files. Unreadable files are logged and skipped.
pub fn scan_region_files(paths: &[PathBuf]) -> FeatureMarkers {
	let mut collector = FeatureCollector::new();
	for path in paths {
		match collector.add_region_file(path) {
			Ok(()) => debug!("Scanned {} for features", path.display()),
			Err(err) => warn!("Failed to scan {}: {err}", path.display()),
		}
	}
	collector.finish()
}
