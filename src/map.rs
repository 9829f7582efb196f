//! A world on disk, seen as a map.
//!
//! [WorldMap] owns the caches and the render-everything job. It is shared
//! between threads behind an [Arc]; every piece of mutable state sits behind
//! its own lock and no lock is held while a region file is read.

use std::{
	collections::HashMap,
	path::PathBuf,
	sync::{Arc, Mutex, MutexGuard, PoisonError},
	thread,
};

use chrono::Utc;
use log::{debug, info, warn};

use crate::{
	MapError, MapResult,
	cache::{MarkerCache, RegionFingerprint, TileCache, TileKey},
	config::{MapConfig, SeedProvider, ServerProperties},
	job::{JobStatus, MapJob},
	render::{render_region_tile, render_seed_preview_tile, Tile},
	world::{
		features::{scan_region_files, FeatureMarkers, PointMarker},
		io::region::{list_region_files, region_file_name, RegionFileEntry},
		level::LevelInfo,
		players::{player_markers, read_user_cache, LivePositions, PlayerMarker},
	},
};

type SharedSeedProvider = Box<dyn SeedProvider + Send + Sync>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct WorldMap {
	config: MapConfig,
	seeds: Option<SharedSeedProvider>,
	tiles: Mutex<TileCache>,
	markers: Mutex<MarkerCache>,
	job: MapJob,
}

impl WorldMap {
	pub fn new(config: MapConfig) -> Self {
		let seeds = config.properties_file.as_ref()
			.map(|path| Box::new(ServerProperties::new(path)) as SharedSeedProvider);
		Self {
			tiles: Mutex::new(TileCache::new(config.tile_cache_capacity)),
			markers: Mutex::new(MarkerCache::new()),
			job: MapJob::new(),
			seeds,
			config,
		}
	}

	/// Replaces the seed source set up from the config.
	pub fn with_seed_provider<S: SeedProvider + Send + Sync + 'static>(mut self, provider: S) -> Self {
		self.seeds = Some(Box::new(provider));
		self
	}

	pub fn config(&self) -> &MapConfig {
		&self.config
	}

	pub fn region_files(&self) -> MapResult<Vec<RegionFileEntry>> {
		list_region_files(self.config.region_dir())
	}

	fn region_path(&self, x: i32, z: i32) -> PathBuf {
		self.config.region_dir().join(region_file_name(x, z))
	}

	/// Reads and renders a region file, replacing any cached tile.
	fn render_region_file(&self, x: i32, z: i32) -> MapResult<Arc<Tile>> {
		let path = self.region_path(x, z);
		let bytes = match std::fs::read(&path) {
			Ok(bytes) => bytes,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
				return Err(MapError::MissingResource(path));
			}
			Err(err) => return Err(err.into()),
		};
		let tile = render_region_tile(&bytes);
		Ok(lock(&self.tiles).put(TileKey::Region { x, z }, tile))
	}

	/// The tile of region `(x, z)`, rendered on first use.
	///
	/// A region that has no file yet gives a background tile. That tile is not
	/// cached, so the region shows up once the file is written.
	pub fn region_tile(&self, x: i32, z: i32) -> MapResult<Arc<Tile>> {
		if let Some(tile) = lock(&self.tiles).get(&TileKey::Region { x, z }) {
			return Ok(tile);
		}
		match self.render_region_file(x, z) {
			Err(err) if err.is_missing() => {
				debug!("No region file for ({x}, {z})");
				Ok(Arc::new(Tile::new()))
			}
			result => result,
		}
	}

	/// The seed preview of region `(x, z)`.
	pub fn seed_preview_tile(&self, seed: &str, x: i32, z: i32) -> Arc<Tile> {
		let key = TileKey::Preview { seed: seed.to_owned(), x, z };
		if let Some(tile) = lock(&self.tiles).get(&key) {
			return tile;
		}
		let tile = render_seed_preview_tile(seed, x, z);
		lock(&self.tiles).put(key, tile)
	}

	/// Structures, villages and spawners of every region file. Rescanned only
	/// when region files are added, removed or modified.
	pub fn feature_markers(&self) -> MapResult<Arc<FeatureMarkers>> {
		let files = self.region_files()?;
		let fingerprint = RegionFingerprint::from_entries(&files);
		if let Some(markers) = lock(&self.markers).get(&fingerprint) {
			return Ok(markers);
		}
		debug!("Scanning {} region files for features", files.len());
		let paths: Vec<PathBuf> = files.iter().map(|file| file.path.clone()).collect();
		let markers = scan_region_files(&paths);
		// Another caller may have stored the same scan while this one ran.
		Ok(lock(&self.markers).get_or_compute(fingerprint, || markers))
	}

	fn level_info(&self) -> MapResult<Option<LevelInfo>> {
		match LevelInfo::read(self.config.level_file()) {
			Ok(info) => Ok(Some(info)),
			Err(err) if err.is_missing() => Ok(None),
			Err(err) => Err(err),
		}
	}

	/// The world spawn point, if the world has a `level.dat`.
	pub fn world_spawn(&self) -> MapResult<Option<PointMarker>> {
		Ok(self.level_info()?.and_then(|info| info.spawn))
	}

	/// Every player with a save file, named from `usercache.json`.
	pub fn player_markers(&self, live: &dyn LivePositions) -> MapResult<Vec<PlayerMarker>> {
		let names = match read_user_cache(self.config.user_cache_path()) {
			Ok(names) => names,
			Err(err) => {
				warn!("Ignoring unreadable user cache: {err}");
				HashMap::new()
			}
		};
		player_markers(
			self.config.playerdata_dir(),
			&names,
			live,
			self.config.live_position_max_age(),
			Utc::now(),
		)
	}

	/// The world seed. The configured provider wins over `level.dat`.
	pub fn seed(&self) -> Option<String> {
		if let Some(seed) = self.seeds.as_ref().and_then(|seeds| seeds.seed()) {
			return Some(seed);
		}
		match self.level_info() {
			Ok(info) => info.and_then(|info| info.seed).map(|seed| seed.to_string()),
			Err(err) => {
				warn!("Failed to read seed from level.dat: {err}");
				None
			}
		}
	}

	/// Starts rendering every region file on a worker thread.
	/// Returns false if a run is already in progress.
	pub fn start_generate_all(self: &Arc<Self>) -> bool {
		let files = match self.region_files() {
			Ok(files) => files,
			Err(err) => {
				// Still a run, just one that fails straight away.
				if !self.job.try_start(0) {
					return false;
				}
				self.job.fail(err);
				self.job.finish();
				return true;
			}
		};
		if !self.job.try_start(files.len()) {
			return false;
		}
		let map = Arc::clone(self);
		let spawned = thread::Builder::new()
			.name("mcmap-generate".to_owned())
			.spawn(move || {
				map.job.run(files, |file| map.render_region_file(file.x, file.z).map(|_| ()));
			});
		if let Err(err) = spawned {
			self.job.fail(err.into());
			self.job.finish();
		}
		true
	}

	pub fn job_status(&self) -> JobStatus {
		self.job.status()
	}

	/// Drops every cached tile and the cached feature markers.
	pub fn clear_caches(&self) {
		lock(&self.tiles).clear();
		lock(&self.markers).clear();
		info!("Cleared tile and marker caches");
	}

	pub fn cached_tiles(&self) -> usize {
		lock(&self.tiles).len()
	}
}
