use std::io::Cursor;

use log::debug;

use crate::{
	MapResult, MapError,
	ioext::*,
	nbt::{self, NamedTag},
};

use super::{
	coord::*,
	sector::*,
	timestamp::*,
	header::*,
	compressionscheme::*,
	HEADER_SIZE,
	CHUNKS_PER_REGION,
};

/// A region file held in memory.
///
/// Only the header is parsed up front. Chunk payloads are located,
/// decompressed and decoded lazily through [ChunkSlot].
pub struct RegionContainer<'a> {
	data: &'a [u8],
	header: RegionHeader,
}

impl<'a> RegionContainer<'a> {
	/// Parses the header of a region file.
	/// Fails if the buffer can't even hold the 8KiB header.
	pub fn open(data: &'a [u8]) -> MapResult<Self> {
		if data.len() < HEADER_SIZE {
			return MapError::malformed(format!(
				"region file is {} bytes, header needs {HEADER_SIZE}",
				data.len(),
			));
		}
		let header = RegionHeader::read_from(&mut Cursor::new(&data[..HEADER_SIZE]))?;
		Ok(Self {
			data,
			header,
		})
	}

	pub fn header(&self) -> &RegionHeader {
		&self.header
	}

	/// Returns the slot at the given coordinate.
	pub fn slot<C: Into<RegionCoord>>(&self, coord: C) -> ChunkSlot<'a> {
		let coord: RegionCoord = coord.into();
		ChunkSlot {
			coord,
			sector: self.header.sectors[coord],
			timestamp: self.header.timestamps[coord],
			data: self.data,
		}
	}

	/// All 1024 slots in table order (`x + z * 32`), present or not.
	pub fn chunks(&self) -> impl Iterator<Item = ChunkSlot<'a>> + '_ {
		(0..CHUNKS_PER_REGION).map(move |index| self.slot(index))
	}

	/// Only the slots whose sector entry points at chunk data.
	pub fn present_chunks(&self) -> impl Iterator<Item = ChunkSlot<'a>> + '_ {
		self.chunks().filter(ChunkSlot::is_present)
	}
}

/// One of the 1024 chunk slots in a region.
#[derive(Debug, Clone, Copy)]
pub struct ChunkSlot<'a> {
	pub coord: RegionCoord,
	pub sector: RegionSector,
	pub timestamp: Timestamp,
	data: &'a [u8],
}

impl<'a> ChunkSlot<'a> {
	/// Chunk X within the region (0..32).
	pub fn x(&self) -> i32 {
		self.coord.x()
	}

	/// Chunk Z within the region (0..32).
	pub fn z(&self) -> i32 {
		self.coord.z()
	}

	pub fn is_present(&self) -> bool {
		self.sector.is_present()
	}

	/// The decompressed chunk NBT bytes.
	/// `Ok(None)` means the slot is empty or declares no payload.
	pub fn payload(&self) -> MapResult<Option<Vec<u8>>> {
		if !self.is_present() {
			return Ok(None);
		}
		let Some(start) = usize::try_from(self.sector.offset()).ok().filter(|start| *start < self.data.len()) else {
			return MapError::malformed(format!("chunk {} starts past the end of the file", self.coord));
		};
		let Some(head) = self.data.get(start..start.saturating_add(5)) else {
			return MapError::malformed(format!("chunk {} starts past the end of the file", self.coord));
		};
		let length = u32::from_be_bytes([head[0], head[1], head[2], head[3]]) as usize;
		if length == 0 {
			return Ok(None);
		}
		let scheme = CompressionScheme::try_from(head[4])?;
		// The length includes the compression byte.
		let body_start = start + 5;
		let body_end = body_start.saturating_add(length - 1);
		let Some(body) = self.data.get(body_start..body_end) else {
			return MapError::malformed(format!(
				"chunk {} declares {length} bytes, file ends at {}",
				self.coord,
				self.data.len(),
			));
		};
		scheme.decompress(body).map(Some)
	}

	/// Decompresses and decodes the chunk, reporting why it failed.
	pub fn try_decode(&self) -> MapResult<Option<NamedTag>> {
		match self.payload()? {
			Some(bytes) => nbt::decode(&bytes).map(Some),
			None => Ok(None),
		}
	}

	/// Decompresses and decodes the chunk.
	/// Any failure makes just this chunk absent.
	pub fn decode(&self) -> Option<NamedTag> {
		match self.try_decode() {
			Ok(tag) => tag,
			Err(err) => {
				debug!("Skipping chunk {}: {err}", self.coord);
				None
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use super::super::testutil::*;
	use crate::nbt::Tag;
	use crate::compound;

	fn chunk_tag(x: i32, z: i32) -> Tag {
		compound! {
			("xPos", x),
			("zPos", z),
		}
	}

	#[test]
	fn too_short_to_open() {
		assert!(matches!(RegionContainer::open(&[0u8; 100]), Err(MapError::MalformedFormat(_))));
	}

	#[test]
	fn empty_region() {
		let bytes = vec![0u8; 8192];
		let region = RegionContainer::open(&bytes).unwrap();
		assert_eq!(region.chunks().count(), 1024);
		assert_eq!(region.present_chunks().count(), 0);
		assert!(region.chunks().all(|slot| slot.decode().is_none()));
	}

	#[test]
	fn reads_chunks_in_index_order() {
		let mut builder = RegionBuilder::new();
		builder.chunk(3, 1, &chunk_tag(3, 1), CompressionScheme::ZLib);
		builder.chunk(0, 2, &chunk_tag(0, 2), CompressionScheme::GZip);
		builder.timestamp(3, 1, 1_600_000_000);
		let bytes = builder.build();
		let region = RegionContainer::open(&bytes).unwrap();
		let present: Vec<_> = region.present_chunks().map(|slot| (slot.x(), slot.z())).collect();
		assert_eq!(present, vec![(3, 1), (0, 2)]);
		let chunk = region.slot((3, 1)).decode().unwrap();
		assert_eq!(chunk.tag().get("xPos").and_then(Tag::as_i32), Some(3));
		assert_eq!(region.slot((3, 1)).timestamp.seconds(), 1_600_000_000);
		let chunk = region.slot((0, 2)).decode().unwrap();
		assert_eq!(chunk.tag().get("zPos").and_then(Tag::as_i32), Some(2));
	}

	#[test]
	fn raw_deflate_under_scheme_two() {
		let mut builder = RegionBuilder::new();
		builder.raw_chunk(1, 1, 2, &deflate(&encode_chunk(&chunk_tag(1, 1))));
		let bytes = builder.build();
		let region = RegionContainer::open(&bytes).unwrap();
		assert!(region.slot((1, 1)).decode().is_some());
	}

	#[test]
	fn one_bad_chunk_does_not_hide_the_rest() {
		let mut builder = RegionBuilder::new();
		builder.chunk(0, 0, &chunk_tag(0, 0), CompressionScheme::ZLib);
		// Garbage that won't inflate.
		builder.raw_chunk(1, 0, 2, &[0xFF; 6]);
		// Uncompressed payloads are not supported.
		builder.raw_chunk(2, 0, 3, &encode_chunk(&chunk_tag(2, 0)));
		builder.chunk(3, 0, &chunk_tag(3, 0), CompressionScheme::GZip);
		let bytes = builder.build();
		let region = RegionContainer::open(&bytes).unwrap();
		let decoded: Vec<_> = region.chunks()
			.filter_map(|slot| slot.decode().map(|_| slot.x()))
			.collect();
		assert_eq!(decoded, vec![0, 3]);
		assert!(matches!(region.slot((1, 0)).try_decode(), Err(MapError::Decompression(_))));
		assert!(matches!(region.slot((2, 0)).try_decode(), Err(MapError::UnsupportedCompression(3))));
	}

	#[test]
	fn overrunning_length_is_absent() {
		let mut builder = RegionBuilder::new();
		builder.chunk(0, 0, &chunk_tag(0, 0), CompressionScheme::ZLib);
		let mut bytes = builder.build();
		// Claim a much larger payload than the file holds.
		bytes[8192..8196].copy_from_slice(&100_000u32.to_be_bytes());
		let region = RegionContainer::open(&bytes).unwrap();
		assert!(region.slot((0, 0)).is_present());
		assert!(matches!(region.slot((0, 0)).try_decode(), Err(MapError::MalformedFormat(_))));
		assert!(region.slot((0, 0)).decode().is_none());
	}

	#[test]
	fn header_pointing_into_header_is_absent() {
		let mut bytes = vec![0u8; 8192 + 4096];
		// Offset 1 sector (inside the timestamp table), count 1.
		bytes[0..4].copy_from_slice(&[0, 0, 1, 1]);
		// Count 0 with a valid offset.
		bytes[4..8].copy_from_slice(&[0, 0, 2, 0]);
		let region = RegionContainer::open(&bytes).unwrap();
		assert!(!region.slot(0usize).is_present());
		assert!(!region.slot(1usize).is_present());
		assert_eq!(region.slot(0usize).payload().unwrap(), None);
	}

	#[test]
	fn sector_past_end_of_file() {
		let mut bytes = vec![0u8; 8192];
		bytes[0..4].copy_from_slice(&[0, 0, 9, 1]);
		let region = RegionContainer::open(&bytes).unwrap();
		assert!(region.slot(0usize).is_present());
		assert!(region.slot(0usize).decode().is_none());
	}

	#[test]
	fn largest_sector_offset_is_malformed() {
		let mut bytes = vec![0u8; 8192];
		// Offset 0xFFFFFF sectors is about 64GiB into the file.
		bytes[0..4].copy_from_slice(&[0xFF, 0xFF, 0xFF, 1]);
		let region = RegionContainer::open(&bytes).unwrap();
		assert!(matches!(region.slot(0usize).payload(), Err(MapError::MalformedFormat(_))));
	}
}
