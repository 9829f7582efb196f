//! Player positions and respawn points from `playerdata/*.dat`.

use std::{
	collections::HashMap,
	path::Path,
};

use chrono::{DateTime, Duration, Utc};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
	MapResult,
	nbt::{
		self,
		Tag,
		lookup::{first_map, TagPath},
	},
};

use super::features::PointMarker;

const POSITION: &[TagPath<'static>] = &[&["Pos"]];
const RESPAWN_POS: &[TagPath<'static>] = &[&["respawn", "pos"]];

/// Where a player was last seen by something faster than the save cycle,
/// such as the server log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LivePosition {
	pub x: f64,
	pub y: f64,
	pub z: f64,
	pub timestamp: DateTime<Utc>,
}

/// Source of live player positions, keyed by player name.
pub trait LivePositions {
	fn live_position(&self, name: &str) -> Option<LivePosition>;
}

/// Used when nothing tracks live positions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLivePositions;

impl LivePositions for NoLivePositions {
	fn live_position(&self, _: &str) -> Option<LivePosition> {
		None
	}
}

impl LivePositions for HashMap<String, LivePosition> {
	fn live_position(&self, name: &str) -> Option<LivePosition> {
		self.get(name).copied()
	}
}

/// One entry of the server's `usercache.json`.
#[derive(Debug, Clone, Deserialize)]
struct UserCacheEntry {
	name: String,
	uuid: String,
}

/// Maps player UUIDs (as written in `playerdata` file names) to names.
/// A missing file gives an empty map.
pub fn read_user_cache<P: AsRef<Path>>(path: P) -> MapResult<HashMap<String, String>> {
	let text = match std::fs::read_to_string(path.as_ref()) {
		Ok(text) => text,
		Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
		Err(err) => return Err(err.into()),
	};
	let entries: Vec<UserCacheEntry> = serde_json::from_str(&text)?;
	Ok(entries.into_iter()
		.map(|entry| (entry.uuid.to_ascii_lowercase(), entry.name))
		.collect())
}

/// What a player file says about a player.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlayerRecord {
	pub position: Option<PointMarker>,
	pub respawn: Option<PointMarker>,
}

impl PlayerRecord {
	pub fn from_tag(root: &Tag) -> Self {
		Self {
			position: first_map(root, POSITION, PointMarker::from_tag),
			respawn: respawn_point(root),
		}
	}

	pub fn read<P: AsRef<Path>>(path: P) -> MapResult<Self> {
		let root = nbt::read_file(path)?;
		Ok(Self::from_tag(root.tag()))
	}
}

/// Newer files keep the respawn point in a `respawn` compound, older ones
/// as `SpawnX`/`SpawnY`/`SpawnZ` on the player itself.
fn respawn_point(root: &Tag) -> Option<PointMarker> {
	if let Some(respawn) = first_map(root, RESPAWN_POS, PointMarker::from_tag) {
		return Some(respawn);
	}
	let axis = |key: &str| root.get(key).and_then(Tag::as_f64);
	Some(PointMarker::new(axis("SpawnX")?, axis("SpawnY")?, axis("SpawnZ")?))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerMarker {
	pub uuid: String,
	pub name: Option<String>,
	pub position: Option<PointMarker>,
	pub respawn: Option<PointMarker>,
	/// True when `position` came from a live source rather than the save file.
	pub live: bool,
}

/// Builds markers for every player file in `playerdata_dir`.
///
/// A live position replaces the saved one if it is younger than `max_age`
/// at `now`. Files that fail to decode are logged and skipped.
pub fn player_markers<P: AsRef<Path>>(
	playerdata_dir: P,
	names: &HashMap<String, String>,
	live: &dyn LivePositions,
	max_age: Duration,
	now: DateTime<Utc>,
) -> MapResult<Vec<PlayerMarker>> {
	let entries = match std::fs::read_dir(playerdata_dir.as_ref()) {
		Ok(entries) => entries,
		Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
		Err(err) => return Err(err.into()),
	};
	let mut markers = Vec::new();
	for entry in entries {
		let path = entry?.path();
		if path.extension().and_then(|ext| ext.to_str()) != Some("dat") {
			continue;
		}
		let Some(uuid) = path.file_stem().and_then(|stem| stem.to_str()) else {
			continue;
		};
		let uuid = uuid.to_ascii_lowercase();
		let record = match PlayerRecord::read(&path) {
			Ok(record) => record,
			Err(err) => {
				warn!("Failed to read player data {}: {err}", path.display());
				continue;
			}
		};
		let name = names.get(&uuid).cloned();
		let mut marker = PlayerMarker {
			uuid,
			name,
			position: record.position,
			respawn: record.respawn,
			live: false,
		};
		let fresh = marker.name.as_deref()
			.and_then(|name| live.live_position(name))
			.filter(|pos| now.signed_duration_since(pos.timestamp) < max_age);
		if let Some(pos) = fresh {
			marker.position = Some(PointMarker::new(pos.x, pos.y, pos.z));
			marker.live = true;
		}
		markers.push(marker);
	}
	markers.sort_by(|a, b| a.uuid.cmp(&b.uuid));
	Ok(markers)
}
