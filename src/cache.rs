//! Memoized tiles and feature markers.
//!
//! Tiles are only ever invalidated by [TileCache::clear]. A region file that
//! changes on disk keeps its old tile until then. Feature markers instead
//! follow the region files: they are rebuilt whenever the set of files or
//! any modification time changes.

use std::{
	sync::Arc,
	time::SystemTime,
};

use indexmap::IndexMap;

use crate::{
	render::Tile,
	world::{
		features::FeatureMarkers,
		io::region::RegionFileEntry,
	},
};

/// What a cached tile was rendered from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TileKey {
	/// A real tile rendered from `r.<x>.<z>.mca`.
	Region { x: i32, z: i32 },
	/// A seed preview.
	Preview { seed: String, x: i32, z: i32 },
}

/// Rendered tiles by key, bounded by a capacity.
/// When full, the tile that was inserted first is dropped.
#[derive(Debug)]
pub struct TileCache {
	capacity: usize,
	tiles: IndexMap<TileKey, Arc<Tile>>,
}

impl TileCache {
	/// A capacity of `0` means unbounded.
	pub fn new(capacity: usize) -> Self {
		Self {
			capacity,
			tiles: IndexMap::new(),
		}
	}

	pub fn get(&self, key: &TileKey) -> Option<Arc<Tile>> {
		self.tiles.get(key).cloned()
	}

	/// Stores a tile and returns the shared handle to it.
	pub fn put(&mut self, key: TileKey, tile: Tile) -> Arc<Tile> {
		let tile = Arc::new(tile);
		// Re-inserting makes the entry the newest.
		self.tiles.shift_remove(&key);
		self.tiles.insert(key, Arc::clone(&tile));
		if self.capacity != 0 {
			while self.tiles.len() > self.capacity {
				self.tiles.shift_remove_index(0);
			}
		}
		tile
	}

	pub fn contains(&self, key: &TileKey) -> bool {
		self.tiles.contains_key(key)
	}

	pub fn clear(&mut self) {
		self.tiles.clear();
	}

	pub fn len(&self) -> usize {
		self.tiles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tiles.is_empty()
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}
}

/// Identity of a set of region files: every file name with its
/// modification time, sorted by name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegionFingerprint(Vec<(String, Option<SystemTime>)>);

impl RegionFingerprint {
	pub fn new<I: IntoIterator<Item = (String, Option<SystemTime>)>>(files: I) -> Self {
		let mut files: Vec<_> = files.into_iter().collect();
		files.sort();
		Self(files)
	}

	pub fn from_entries(entries: &[RegionFileEntry]) -> Self {
		Self::new(entries.iter().map(|entry| (entry.file_name(), entry.modified)))
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

/// The last feature scan, reused while the fingerprint stays the same.
#[derive(Debug, Default)]
pub struct MarkerCache {
	entry: Option<(RegionFingerprint, Arc<FeatureMarkers>)>,
}

impl MarkerCache {
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns the cached markers if `fingerprint` matches the one they were
	/// computed for. Otherwise runs `compute` and caches its result.
	pub fn get_or_compute<F>(&mut self, fingerprint: RegionFingerprint, compute: F) -> Arc<FeatureMarkers>
	where
	F: FnOnce() -> FeatureMarkers {
		if let Some((cached, markers)) = &self.entry {
			if *cached == fingerprint {
				return Arc::clone(markers);
			}
		}
		let markers = Arc::new(compute());
		self.entry = Some((fingerprint, Arc::clone(&markers)));
		markers
	}

	pub fn get(&self, fingerprint: &RegionFingerprint) -> Option<Arc<FeatureMarkers>> {
		self.entry.as_ref()
			.filter(|(cached, _)| cached == fingerprint)
			.map(|(_, markers)| Arc::clone(markers))
	}

	pub fn clear(&mut self) {
		self.entry = None;
	}

	pub fn is_empty(&self) -> bool {
		self.entry.is_none()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration;
	use crate::world::features::StructureMarker;

	fn region(x: i32, z: i32) -> TileKey {
		TileKey::Region { x, z }
	}

	#[test]
	fn evicts_oldest_insertion() {
		let mut cache = TileCache::new(2);
		cache.put(region(0, 0), Tile::filled([1, 1, 1]));
		cache.put(region(1, 0), Tile::filled([2, 2, 2]));
		// Reading does not refresh an entry.
		assert!(cache.get(&region(0, 0)).is_some());
		cache.put(region(2, 0), Tile::filled([3, 3, 3]));
		assert_eq!(cache.len(), 2);
		assert!(!cache.contains(&region(0, 0)));
		assert_eq!(cache.get(&region(2, 0)).unwrap().get(0, 0), [3, 3, 3]);

		// Re-inserting moves an entry to the back.
		cache.put(region(1, 0), Tile::filled([4, 4, 4]));
		cache.put(region(3, 0), Tile::new());
		assert!(cache.contains(&region(1, 0)));
		assert!(!cache.contains(&region(2, 0)));
	}

	#[test]
	fn preview_and_region_keys_are_distinct() {
		let mut cache = TileCache::new(0);
		cache.put(region(0, 0), Tile::filled([1, 1, 1]));
		cache.put(TileKey::Preview { seed: "1".into(), x: 0, z: 0 }, Tile::filled([2, 2, 2]));
		cache.put(TileKey::Preview { seed: "2".into(), x: 0, z: 0 }, Tile::filled([3, 3, 3]));
		assert_eq!(cache.len(), 3);
		cache.clear();
		assert!(cache.is_empty());
	}

	#[test]
	fn markers_follow_fingerprint() {
		let t0 = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
		let t1 = t0 + Duration::from_secs(5);
		let first = RegionFingerprint::new([("r.1.0.mca".to_owned(), Some(t0)), ("r.0.0.mca".to_owned(), Some(t0))]);
		let same = RegionFingerprint::new([("r.0.0.mca".to_owned(), Some(t0)), ("r.1.0.mca".to_owned(), Some(t0))]);
		let touched = RegionFingerprint::new([("r.0.0.mca".to_owned(), Some(t0)), ("r.1.0.mca".to_owned(), Some(t1))]);
		assert_eq!(first, same);

		let mut cache = MarkerCache::new();
		let mut scans = 0;
		let mut scan = || {
			scans += 1;
			FeatureMarkers {
				structures: vec![StructureMarker { kind: "igloo".into(), label: "Igloo".into(), x: scans, z: 0 }],
				..Default::default()
			}
		};
		let a = cache.get_or_compute(first, &mut scan);
		let b = cache.get_or_compute(same.clone(), &mut scan);
		assert!(Arc::ptr_eq(&a, &b));
		assert!(cache.get(&same).is_some());
		let c = cache.get_or_compute(touched.clone(), &mut scan);
		assert_eq!(c.structures[0].x, 2);
		assert!(cache.get(&same).is_none());
		cache.clear();
		assert!(cache.get(&touched).is_none());
		drop(scan);
		assert_eq!(scans, 2);
	}
}
