//! The NBT decoder.
//!
//! Decoding works directly on a byte slice. Every declared length is checked
//! against the bytes that remain before anything is allocated, so a truncated
//! or corrupt stream fails fast with [MapError::MalformedFormat] instead of
//! reading garbage or allocating gigabytes.
//!
//! Unknown tag ids are not fatal. The value is treated as absent, but the
//! reader can no longer know where the next tag starts, so every enclosing
//! container stops reading and keeps what it already has.

use std::path::Path;

use byteorder::{BigEndian, ByteOrder};

use crate::{
	MapError, MapResult,
	ioext::inflate_auto,
};
use super::{
	Map,
	tag::*,
	tagtype::TypeId,
};

/// Deepest nesting accepted before the stream is considered malformed.
pub const MAX_DEPTH: usize = 512;

struct TagReader<'a> {
	data: &'a [u8],
	pos: usize,
	depth: usize,
	/// Set once an unknown tag id was met. After that the position in the
	/// stream is meaningless and every open container stops reading.
	desynced: bool,
}

impl<'a> TagReader<'a> {
	fn new(data: &'a [u8]) -> Self {
		Self {
			data,
			pos: 0,
			depth: 0,
			desynced: false,
		}
	}

	fn remaining(&self) -> usize {
		self.data.len() - self.pos
	}

	fn take(&mut self, count: usize, what: &str) -> MapResult<&'a [u8]> {
		if count > self.remaining() {
			return MapError::malformed(format!(
				"{what} needs {count} bytes at offset {} but only {} remain",
				self.pos,
				self.remaining(),
			));
		}
		let slice = &self.data[self.pos..self.pos + count];
		self.pos += count;
		Ok(slice)
	}

	fn read_u8(&mut self) -> MapResult<u8> {
		Ok(self.take(1, "byte")?[0])
	}

	fn read_i16(&mut self) -> MapResult<i16> {
		Ok(BigEndian::read_i16(self.take(2, "short")?))
	}

	fn read_i32(&mut self) -> MapResult<i32> {
		Ok(BigEndian::read_i32(self.take(4, "int")?))
	}

	fn read_i64(&mut self) -> MapResult<i64> {
		Ok(BigEndian::read_i64(self.take(8, "long")?))
	}

	fn read_f32(&mut self) -> MapResult<f32> {
		Ok(BigEndian::read_f32(self.take(4, "float")?))
	}

	fn read_f64(&mut self) -> MapResult<f64> {
		Ok(BigEndian::read_f64(self.take(8, "double")?))
	}

	/// Reads an array length prefix. Negative lengths are malformed.
	fn read_length(&mut self, what: &str) -> MapResult<usize> {
		let length = self.read_i32()?;
		usize::try_from(length)
			.or_else(|_| MapError::malformed(format!("{what} has negative length {length}")))
	}

	fn read_string(&mut self) -> MapResult<String> {
		let length = BigEndian::read_u16(self.take(2, "string length")?) as usize;
		let bytes = self.take(length, "string")?;
		// Strings are "modified UTF-8". Anything that isn't plain UTF-8 is
		// rare enough (encoded nulls, surrogate pairs) to be replaced.
		Ok(String::from_utf8_lossy(bytes).into_owned())
	}

	fn read_byte_array(&mut self) -> MapResult<Vec<i8>> {
		let length = self.read_length("byte array")?;
		let bytes = self.take(length, "byte array")?;
		Ok(bytemuck::cast_slice::<u8, i8>(bytes).to_vec())
	}

	fn read_int_array(&mut self) -> MapResult<Vec<i32>> {
		let length = self.read_length("int array")?;
		let byte_len = length.checked_mul(4)
			.ok_or_else(|| MapError::MalformedFormat("int array length overflow".to_owned()))?;
		let bytes = self.take(byte_len, "int array")?;
		Ok(bytes.chunks_exact(4).map(BigEndian::read_i32).collect())
	}

	fn read_long_array(&mut self) -> MapResult<Vec<i64>> {
		let length = self.read_length("long array")?;
		let byte_len = length.checked_mul(8)
			.ok_or_else(|| MapError::MalformedFormat("long array length overflow".to_owned()))?;
		let bytes = self.take(byte_len, "long array")?;
		Ok(bytes.chunks_exact(8).map(BigEndian::read_i64).collect())
	}

	fn enter(&mut self) -> MapResult<()> {
		self.depth += 1;
		if self.depth > MAX_DEPTH {
			return MapError::malformed(format!("nesting deeper than {MAX_DEPTH}"));
		}
		Ok(())
	}

	fn leave(&mut self) {
		self.depth -= 1;
	}

	/// Reads the payload of a tag with the given id.
	/// Returns `None` for ids this reader doesn't know (the value is absent).
	fn read_payload(&mut self, id: u8) -> MapResult<Option<Tag>> {
		let Ok(id) = TagID::try_from(id) else {
			log::debug!("unknown tag id {id} at offset {}, treating value as absent", self.pos - 1);
			self.desynced = true;
			return Ok(None);
		};
		Ok(Some(match id {
			TagID::End => return MapError::malformed("end tag used as a value"),
			TagID::Byte => Tag::Byte(self.read_u8()? as i8),
			TagID::Short => Tag::Short(self.read_i16()?),
			TagID::Int => Tag::Int(self.read_i32()?),
			TagID::Long => Tag::Long(self.read_i64()?),
			TagID::Float => Tag::Float(self.read_f32()?),
			TagID::Double => Tag::Double(self.read_f64()?),
			TagID::ByteArray => Tag::ByteArray(self.read_byte_array()?),
			TagID::String => Tag::String(self.read_string()?),
			TagID::List => match self.read_list()? {
				Some(list) => Tag::List(list),
				None => return Ok(None),
			},
			TagID::Compound => Tag::Compound(self.read_compound()?),
			TagID::IntArray => Tag::IntArray(self.read_int_array()?),
			TagID::LongArray => Tag::LongArray(self.read_long_array()?),
		}))
	}

	/// Reads compound entries up to and including the end marker.
	/// Running out of bytes before the end marker is fatal.
	fn read_compound(&mut self) -> MapResult<Map> {
		self.enter()?;
		let mut map = Map::new();
		while !self.desynced {
			if self.remaining() == 0 {
				return MapError::malformed("unterminated compound");
			}
			let id = self.read_u8()?;
			if id == TagID::End as u8 {
				break;
			}
			let name = self.read_string()?;
			if let Some(tag) = self.read_payload(id)? {
				map.insert(name, tag);
			}
		}
		self.leave();
		Ok(map)
	}

	/// Reads `length` elements with `read`, checking up front that the
	/// declared length can fit in what is left of the buffer.
	fn read_elements<T: TypeId>(
		&mut self,
		length: usize,
		mut read: impl FnMut(&mut Self) -> MapResult<T>,
	) -> MapResult<Vec<T>> {
		let needed = length.saturating_mul(T::min_payload_size());
		if needed > self.remaining() {
			return MapError::malformed(format!(
				"list of {length} elements can't fit in {} bytes",
				self.remaining(),
			));
		}
		let mut items = Vec::with_capacity(length);
		for _ in 0..length {
			items.push(read(self)?);
			if self.desynced {
				break;
			}
		}
		Ok(items)
	}

	fn read_list(&mut self) -> MapResult<Option<ListTag>> {
		let element_id = self.read_u8()?;
		// Negative lengths are written for some empty lists.
		let length = self.read_i32()?.max(0) as usize;
		if length == 0 {
			return Ok(Some(ListTag::Empty));
		}
		self.enter()?;
		let list = match TagID::try_from(element_id) {
			Ok(TagID::Byte) => ListTag::Byte(self.read_elements(length, |r| Ok(r.read_u8()? as i8))?),
			Ok(TagID::Short) => ListTag::Short(self.read_elements(length, Self::read_i16)?),
			Ok(TagID::Int) => ListTag::Int(self.read_elements(length, Self::read_i32)?),
			Ok(TagID::Long) => ListTag::Long(self.read_elements(length, Self::read_i64)?),
			Ok(TagID::Float) => ListTag::Float(self.read_elements(length, Self::read_f32)?),
			Ok(TagID::Double) => ListTag::Double(self.read_elements(length, Self::read_f64)?),
			Ok(TagID::ByteArray) => ListTag::ByteArray(self.read_elements(length, Self::read_byte_array)?),
			Ok(TagID::String) => ListTag::String(self.read_elements(length, Self::read_string)?),
			Ok(TagID::Compound) => ListTag::Compound(self.read_elements(length, Self::read_compound)?),
			Ok(TagID::IntArray) => ListTag::IntArray(self.read_elements(length, Self::read_int_array)?),
			Ok(TagID::LongArray) => ListTag::LongArray(self.read_elements(length, Self::read_long_array)?),
			Ok(TagID::List) => {
				let mut lists = Vec::with_capacity(length.min(self.remaining() / 5));
				for _ in 0..length {
					match self.read_list()? {
						Some(list) => lists.push(list),
						None => break,
					}
					if self.desynced {
						break;
					}
				}
				ListTag::List(lists)
			}
			Ok(TagID::End) => return MapError::malformed("non-empty list of end tags"),
			Err(unknown) => {
				log::debug!("list of unknown element id {unknown}, treating value as absent");
				self.desynced = true;
				self.leave();
				return Ok(None);
			}
		};
		self.leave();
		Ok(Some(list))
	}
}

/// Decodes an uncompressed NBT stream.
///
/// The stream must start with a compound tag (id 10) and its name. Trailing
/// bytes after the root compound are ignored.
pub fn decode(bytes: &[u8]) -> MapResult<NamedTag> {
	let mut reader = TagReader::new(bytes);
	if reader.remaining() == 0 {
		return MapError::malformed("empty stream");
	}
	let root_id = reader.read_u8()?;
	if root_id != TagID::Compound as u8 {
		return MapError::malformed(format!("root tag id {root_id} is not a compound"));
	}
	let name = reader.read_string()?;
	let map = reader.read_compound()?;
	Ok(NamedTag::new(name, Tag::Compound(map)))
}

/// Decodes a compressed NBT stream. gzip is tried first, then zlib, then raw deflate.
pub fn decode_compressed(bytes: &[u8]) -> MapResult<NamedTag> {
	let raw = inflate_auto(bytes)?;
	decode(&raw)
}

/// Reads a compressed single-value file such as `level.dat` or a player file.
/// A file that doesn't exist is reported as [MapError::MissingResource].
pub fn read_file<P: AsRef<Path>>(path: P) -> MapResult<NamedTag> {
	let path = path.as_ref();
	let bytes = match std::fs::read(path) {
		Ok(bytes) => bytes,
		Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
			return Err(MapError::MissingResource(path.to_owned()));
		}
		Err(err) => return Err(err.into()),
	};
	decode_compressed(&bytes)
}
