//! Builds region files in memory for tests.

use std::io::Write;

use flate2::{
	Compression,
	write::DeflateEncoder,
};

use crate::nbt::{
	Tag,
	testutil::{encode_named, gzip, zlib},
};

use super::{
	CompressionScheme,
	RegionCoord,
	HEADER_SIZE,
	SECTOR_SIZE,
};

/// The timestamp table follows the 4KiB sector table.
const TIMESTAMP_TABLE: usize = SECTOR_SIZE as usize;

/// Encodes a chunk root compound with an empty name.
pub fn encode_chunk(tag: &Tag) -> Vec<u8> {
	encode_named("", tag)
}

pub fn deflate(bytes: &[u8]) -> Vec<u8> {
	let mut encoder = DeflateEncoder::new(Vec::new(), Compression::fast());
	encoder.write_all(bytes).unwrap();
	encoder.finish().unwrap()
}

/// Lays chunks out one after another, each padded to whole sectors.
pub struct RegionBuilder {
	header: Vec<u8>,
	body: Vec<u8>,
}

impl RegionBuilder {
	pub fn new() -> Self {
		Self {
			header: vec![0u8; HEADER_SIZE],
			body: Vec::new(),
		}
	}

	/// Writes a chunk compressed with `scheme`.
	pub fn chunk(&mut self, x: u16, z: u16, tag: &Tag, scheme: CompressionScheme) -> &mut Self {
		let raw = encode_chunk(tag);
		let compressed = match scheme {
			CompressionScheme::GZip => gzip(&raw),
			CompressionScheme::ZLib => zlib(&raw),
		};
		self.raw_chunk(x, z, scheme as u8, &compressed)
	}

	/// Writes an arbitrary payload under an arbitrary scheme byte.
	pub fn raw_chunk(&mut self, x: u16, z: u16, scheme: u8, payload: &[u8]) -> &mut Self {
		let coord = RegionCoord::new(x, z);
		let sector_size = SECTOR_SIZE as usize;
		let offset = (HEADER_SIZE + self.body.len()) / sector_size;
		let mut record = Vec::with_capacity(payload.len() + 5);
		record.extend(((payload.len() + 1) as u32).to_be_bytes());
		record.push(scheme);
		record.extend(payload);
		let count = (record.len() + sector_size - 1) / sector_size;
		record.resize(count * sector_size, 0);
		self.body.extend(record);
		let entry = ((offset as u32) << 8) | count as u32;
		let at = coord.index() * 4;
		self.header[at..at + 4].copy_from_slice(&entry.to_be_bytes());
		self
	}

	pub fn timestamp(&mut self, x: u16, z: u16, seconds: u32) -> &mut Self {
		let at = TIMESTAMP_TABLE + RegionCoord::new(x, z).index() * 4;
		self.header[at..at + 4].copy_from_slice(&seconds.to_be_bytes());
		self
	}

	pub fn build(&self) -> Vec<u8> {
		let mut bytes = self.header.clone();
		bytes.extend(&self.body);
		bytes
	}
}
