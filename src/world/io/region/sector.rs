use std::io::Read;

use crate::ioext::*;
use crate::MapResult;

use super::{SECTOR_SIZE, HEADER_SIZE};

/// Offset and size are packed together.
/// |Offset:3|Size:1|
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct RegionSector(u32);

impl RegionSector {
	/// Provide offset and size in 4KiB chunks.
	pub fn new(offset: u32, size: u8) -> Self {
		Self(offset.overflowing_shl(8).0 | size as u32)
	}

	/// Creates a new empty RegionSector.
	pub const fn empty() -> Self {
		Self(0)
	}

	/// The 4KiB sector offset.
	/// Multiply this by `4096` to get the byte offset.
	pub fn sector_offset(&self) -> u64 {
		self.0.overflowing_shr(8).0 as u64
	}

	/// The 4KiB sector count.
	pub fn sector_count(&self) -> u64 {
		(self.0 & 0xFF) as u64
	}

	/// The offset in bytes that this sector begins at in the region file.
	pub fn offset(&self) -> u64 {
		self.sector_offset() * SECTOR_SIZE
	}

	/// Determines if this is an "empty" sector.
	pub fn is_empty(&self) -> bool {
		self.0 == 0
	}

	/// A sector only points at chunk data if it has a size and starts past
	/// the header. Anything else (including offsets pointing into the header
	/// itself) means the chunk is absent.
	pub fn is_present(&self) -> bool {
		self.sector_count() != 0 && self.offset() >= HEADER_SIZE as u64
	}
}

impl Readable for RegionSector {
	fn read_from<R: Read>(reader: &mut R) -> MapResult<Self> {
		Ok(Self(reader.read_value()?))
	}
}
