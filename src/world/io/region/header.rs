use crate::{
	ioext::*,
	MapResult,
};

use super::sector::*;
use super::timestamp::*;
use super::coord::*;
use super::CHUNKS_PER_REGION;

use std::{
	fmt::Debug,
	io::Read,
	ops::Index,
};

/// A table of 1024 elements that contain information related to
/// a Minecraft chunk within a Region file.
#[derive(Debug, Clone)]
pub struct RegionTable<T>(Box<[T; CHUNKS_PER_REGION]>);

/// A table of 1024 [RegionSector] elements for each potential chunk in
/// a 32x32 chunk region file.
pub type SectorTable = RegionTable<RegionSector>;

/// A table of 1024 [Timestamp] elements for each potential chunk in a
/// 32x32 chunk region file.
pub type TimestampTable = RegionTable<Timestamp>;

/// The header at the beginning of every region file.
/// It contains 1024 [RegionSector] elements and 1024 [Timestamp] elements.
#[derive(Debug, Clone, Default)]
pub struct RegionHeader {
	/// Where chunks exist in the file.
	pub sectors: SectorTable,
	/// The last modification time for each chunk.
	pub timestamps: TimestampTable,
}

impl<T: Default + Copy> Default for RegionTable<T> {
	fn default() -> Self {
		Self(Box::new([T::default(); CHUNKS_PER_REGION]))
	}
}

impl<C: Into<RegionCoord>, T> Index<C> for RegionTable<T> {
	type Output = T;

	fn index(&self, index: C) -> &Self::Output {
		let coord: RegionCoord = index.into();
		&self.0[coord.index()]
	}
}

impl<T: Readable + Debug + Default + Copy> Readable for RegionTable<T> {
	fn read_from<R: Read>(reader: &mut R) -> MapResult<Self> {
		let mut table = Box::new([T::default(); CHUNKS_PER_REGION]);
		for entry in table.iter_mut() {
			*entry = T::read_from(reader)?;
		}
		Ok(Self(table))
	}
}

impl Readable for RegionHeader {
	fn read_from<R: Read>(reader: &mut R) -> MapResult<Self> {
		Ok(Self {
			sectors: SectorTable::read_from(reader)?,
			timestamps: TimestampTable::read_from(reader)?,
		})
	}
}
