//! Where the world lives and how the map treats it.

use std::{
	collections::HashMap,
	path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{MapError, MapResult};

pub const DEFAULT_TILE_CACHE_CAPACITY: usize = 256;
pub const DEFAULT_LIVE_POSITION_MAX_AGE_SECS: u64 = 30;

/// Map settings. Every field has a default, so a config file only needs the
/// fields it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapConfig {
	/// World root, holding `level.dat`, `region/` and `playerdata/`.
	pub world_dir: PathBuf,
	/// Sub-directory of another dimension, such as `DIM-1`.
	pub dimension: Option<String>,
	/// Most tiles kept in memory. `0` keeps everything.
	pub tile_cache_capacity: usize,
	/// How long a live player position beats the saved one.
	pub live_position_max_age_secs: u64,
	/// `server.properties` to read the seed from.
	pub properties_file: Option<PathBuf>,
	/// `usercache.json`. Defaults to the one beside the world directory.
	pub user_cache_file: Option<PathBuf>,
}

impl Default for MapConfig {
	fn default() -> Self {
		Self {
			world_dir: PathBuf::from("world"),
			dimension: None,
			tile_cache_capacity: DEFAULT_TILE_CACHE_CAPACITY,
			live_position_max_age_secs: DEFAULT_LIVE_POSITION_MAX_AGE_SECS,
			properties_file: None,
			user_cache_file: None,
		}
	}
}

impl MapConfig {
	pub fn for_world<P: AsRef<Path>>(world_dir: P) -> Self {
		Self {
			world_dir: world_dir.as_ref().to_owned(),
			..Default::default()
		}
	}

	/// Reads a JSON config file.
	pub fn load<P: AsRef<Path>>(path: P) -> MapResult<Self> {
		let path = path.as_ref();
		let text = match std::fs::read_to_string(path) {
			Ok(text) => text,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
				return Err(MapError::MissingResource(path.to_owned()));
			}
			Err(err) => return Err(err.into()),
		};
		serde_json::from_str(&text)
			.map_err(|err| MapError::Config(format!("{}: {err}", path.display())))
	}

	/// Directory of the dimension being mapped.
	pub fn dimension_dir(&self) -> PathBuf {
		match &self.dimension {
			Some(dimension) => self.world_dir.join(dimension),
			None => self.world_dir.clone(),
		}
	}

	pub fn region_dir(&self) -> PathBuf {
		self.dimension_dir().join("region")
	}

	/// Player data is shared by every dimension.
	pub fn playerdata_dir(&self) -> PathBuf {
		self.world_dir.join("playerdata")
	}

	pub fn level_file(&self) -> PathBuf {
		self.world_dir.join("level.dat")
	}

	/// The server keeps `usercache.json` next to the world directory.
	pub fn user_cache_path(&self) -> PathBuf {
		if let Some(path) = &self.user_cache_file {
			return path.clone();
		}
		self.world_dir
			.parent()
			.unwrap_or_else(|| Path::new(""))
			.join("usercache.json")
	}

	pub fn live_position_max_age(&self) -> chrono::Duration {
		chrono::Duration::seconds(self.live_position_max_age_secs.min(i64::MAX as u64) as i64)
	}
}

/// Supplies the configured world seed.
pub trait SeedProvider {
	fn seed(&self) -> Option<String>;
}

/// A seed given up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedSeed(pub String);

impl SeedProvider for FixedSeed {
	fn seed(&self) -> Option<String> {
		Some(self.0.clone())
	}
}

/// Reads `level-seed` from a `server.properties` file each time it's asked,
/// so edits to the file are picked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerProperties {
	path: PathBuf,
}

impl ServerProperties {
	pub fn new<P: AsRef<Path>>(path: P) -> Self {
		Self {
			path: path.as_ref().to_owned(),
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn read(&self) -> MapResult<HashMap<String, String>> {
		let text = std::fs::read_to_string(&self.path)?;
		Ok(parse_properties(&text))
	}
}

impl SeedProvider for ServerProperties {
	fn seed(&self) -> Option<String> {
		let mut properties = match self.read() {
			Ok(properties) => properties,
			Err(err) => {
				log::debug!("No seed from {}: {err}", self.path.display());
				return None;
			}
		};
		properties.remove("level-seed").filter(|seed| !seed.is_empty())
	}
}

/// Parses `key=value` lines. Blank lines and `#`/`!` comments are skipped,
/// and `:` is accepted as the separator as well.
pub fn parse_properties(text: &str) -> HashMap<String, String> {
	text.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
		.filter_map(|line| {
			let split = line.find(|c: char| c == '=' || c == ':')?;
			let (key, value) = line.split_at(split);
			Some((key.trim().to_owned(), value[1..].trim().to_owned()))
		})
		.collect()
}
