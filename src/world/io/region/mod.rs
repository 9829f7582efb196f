//! Reading Anvil region containers (`r.<x>.<z>.mca`).
//!
//! A region holds up to 32x32 chunks. The first 4KiB is the sector table, the
//! second 4KiB the timestamp table, and chunk payloads live in 4KiB sectors
//! after that.

pub mod header;
pub mod sector;
pub mod timestamp;
pub mod coord;
pub mod reader;
pub mod compressionscheme;

#[cfg(test)]
pub mod testutil;

use std::{
	path::{Path, PathBuf},
	time::SystemTime,
};

use crate::MapResult;

pub use coord::RegionCoord;
pub use reader::{RegionContainer, ChunkSlot};
pub use compressionscheme::CompressionScheme;

/// Size of one allocation unit in a region file.
pub const SECTOR_SIZE: u64 = 4096;

/// Size of the sector table plus the timestamp table.
pub const HEADER_SIZE: usize = 8192;

/// Number of chunk slots in a region.
pub const CHUNKS_PER_REGION: usize = 1024;

/// Builds the file name of the region at region coordinates `(x, z)`.
pub fn region_file_name(x: i32, z: i32) -> String {
	format!("r.{x}.{z}.mca")
}

/// Parses `r.<x>.<z>.mca` into region coordinates.
pub fn parse_region_file_name(name: &str) -> Option<(i32, i32)> {
	let inner = name.strip_prefix("r.")?.strip_suffix(".mca")?;
	let (x, z) = inner.split_once('.')?;
	Some((x.parse().ok()?, z.parse().ok()?))
}

/// A region file found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionFileEntry {
	pub path: PathBuf,
	pub x: i32,
	pub z: i32,
	pub modified: Option<SystemTime>,
}

impl RegionFileEntry {
	pub fn file_name(&self) -> String {
		region_file_name(self.x, self.z)
	}
}

/// Lists the `r.<x>.<z>.mca` files in `dir`, sorted by coordinate.
/// A missing directory has no region files.
pub fn list_region_files<P: AsRef<Path>>(dir: P) -> MapResult<Vec<RegionFileEntry>> {
	let entries = match std::fs::read_dir(dir.as_ref()) {
		Ok(entries) => entries,
		Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
		Err(err) => return Err(err.into()),
	};
	let mut files = Vec::new();
	for entry in entries {
		let entry = entry?;
		let Some((x, z)) = entry.file_name().to_str().and_then(parse_region_file_name) else {
			continue;
		};
		let metadata = entry.metadata()?;
		if !metadata.is_file() {
			continue;
		}
		files.push(RegionFileEntry {
			path: entry.path(),
			x,
			z,
			modified: metadata.modified().ok(),
		});
	}
	files.sort_by_key(|file| (file.x, file.z));
	Ok(files)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn region_file_names() {
		assert_eq!(region_file_name(-1, 12), "r.-1.12.mca");
		assert_eq!(parse_region_file_name("r.-1.12.mca"), Some((-1, 12)));
		assert_eq!(parse_region_file_name("r.0.0.mcc"), None);
		assert_eq!(parse_region_file_name("r.a.0.mca"), None);
		assert_eq!(parse_region_file_name("r.1.2.3.mca"), None);
	}

	#[test]
	fn lists_region_files() {
		let dir = tempfile::tempdir().unwrap();
		for name in ["r.1.0.mca", "r.-1.0.mca", "r.0.0.mcc", "notes.txt"] {
			std::fs::write(dir.path().join(name), b"").unwrap();
		}
		std::fs::create_dir(dir.path().join("r.5.5.mca")).unwrap();
		let files = list_region_files(dir.path()).unwrap();
		let coords: Vec<_> = files.iter().map(|file| (file.x, file.z)).collect();
		assert_eq!(coords, vec![(-1, 0), (1, 0)]);
		assert_eq!(files[0].file_name(), "r.-1.0.mca");
		assert!(list_region_files(dir.path().join("missing")).unwrap().is_empty());
	}
}
