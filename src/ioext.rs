//! Big-endian reading helpers shared by the region and NBT readers.

use std::io::{
	self,
	Read,
};

use byteorder::{BigEndian, ReadBytesExt};
use flate2::read::{
	DeflateDecoder,
	GzDecoder,
	ZlibDecoder,
};

use crate::{MapError, MapResult};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A type that can be read from a big-endian byte stream.
pub trait Readable: Sized {
	fn read_from<R: Read>(reader: &mut R) -> MapResult<Self>;
}

pub trait ReadExt: Read + Sized {
	/// Reads any [Readable] value.
	/// ```rust,ignore
	/// let length: u32 = reader.read_value()?;
	/// ```
	fn read_value<T: Readable>(&mut self) -> MapResult<T> {
		T::read_from(self)
	}
}

impl<R: Read> ReadExt for R {}

macro_rules! __readable_impl {
	($type:ty => $method:ident) => {
		impl Readable for $type {
			fn read_from<R: Read>(reader: &mut R) -> MapResult<Self> {
				Ok(reader.$method::<BigEndian>()?)
			}
		}
	};
}

__readable_impl!(u16 => read_u16);
__readable_impl!(i16 => read_i16);
__readable_impl!(u32 => read_u32);
__readable_impl!(i32 => read_i32);
__readable_impl!(u64 => read_u64);
__readable_impl!(i64 => read_i64);
__readable_impl!(f32 => read_f32);
__readable_impl!(f64 => read_f64);

impl Readable for u8 {
	fn read_from<R: Read>(reader: &mut R) -> MapResult<Self> {
		Ok(reader.read_u8()?)
	}
}

impl Readable for i8 {
	fn read_from<R: Read>(reader: &mut R) -> MapResult<Self> {
		Ok(reader.read_i8()?)
	}
}

/// Reads a stream to the end into a fresh buffer.
pub fn read_all<R: Read>(mut reader: R) -> io::Result<Vec<u8>> {
	let mut buffer = Vec::new();
	reader.read_to_end(&mut buffer)?;
	Ok(buffer)
}

fn inflate_with<R: Read>(decoder: R) -> MapResult<Vec<u8>> {
	read_all(decoder).map_err(|err| MapError::Decompression(err.to_string()))
}

/// Decompresses a gzip member.
pub fn inflate_gzip(bytes: &[u8]) -> MapResult<Vec<u8>> {
	if !bytes.starts_with(&GZIP_MAGIC) {
		return Err(MapError::Decompression("missing gzip header".to_owned()));
	}
	inflate_with(GzDecoder::new(bytes))
}

/// Decompresses a zlib-wrapped deflate stream.
pub fn inflate_zlib(bytes: &[u8]) -> MapResult<Vec<u8>> {
	inflate_with(ZlibDecoder::new(bytes))
}

/// Decompresses a raw deflate stream (no header, no checksum).
pub fn inflate_deflate(bytes: &[u8]) -> MapResult<Vec<u8>> {
	inflate_with(DeflateDecoder::new(bytes))
}

/// Decompresses data of unknown framing.
/// gzip is attempted first, then zlib, then raw deflate.
pub fn inflate_auto(bytes: &[u8]) -> MapResult<Vec<u8>> {
	inflate_gzip(bytes)
		.or_else(|_| inflate_zlib(bytes))
		.or_else(|_| inflate_deflate(bytes))
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Cursor;

	#[test]
	fn reads_big_endian() {
		let mut cursor = Cursor::new(vec![0x00, 0x01, 0x02, 0x03, 0xFF, 0xFE]);
		let value: u32 = cursor.read_value().unwrap();
		assert_eq!(value, 0x0001_0203);
		let value: i16 = cursor.read_value().unwrap();
		assert_eq!(value, -2);
		assert!(cursor.read_value::<u8>().is_err());
	}

	#[test]
	fn auto_inflate_detects_framing() {
		use flate2::{Compression, write::{GzEncoder, ZlibEncoder, DeflateEncoder}};
		use std::io::Write;
		let payload = b"the quick brown fox".to_vec();

		let mut gz = GzEncoder::new(Vec::new(), Compression::default());
		gz.write_all(&payload).unwrap();
		let mut zlib = ZlibEncoder::new(Vec::new(), Compression::default());
		zlib.write_all(&payload).unwrap();
		let mut raw = DeflateEncoder::new(Vec::new(), Compression::default());
		raw.write_all(&payload).unwrap();

		assert_eq!(inflate_auto(&gz.finish().unwrap()).unwrap(), payload);
		assert_eq!(inflate_auto(&zlib.finish().unwrap()).unwrap(), payload);
		assert_eq!(inflate_auto(&raw.finish().unwrap()).unwrap(), payload);
	}

	#[test]
	fn gzip_requires_magic() {
		assert!(matches!(inflate_gzip(&[1, 2, 3]), Err(MapError::Decompression(_))));
	}
}
