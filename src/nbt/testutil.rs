//! Test-only NBT encoder for building fixtures. The crate itself never writes NBT.

use std::io::Write;

use flate2::{
	Compression,
	write::{GzEncoder, ZlibEncoder},
};

use super::{Map, tag::*};

fn write_string(out: &mut Vec<u8>, value: &str) {
	out.extend((value.len() as u16).to_be_bytes());
	out.extend(value.as_bytes());
}

fn write_compound(out: &mut Vec<u8>, map: &Map) {
	// Sorted so that fixtures are byte-stable regardless of map type.
	let mut entries: Vec<_> = map.iter().collect();
	entries.sort_by(|a, b| a.0.cmp(b.0));
	for (name, tag) in entries {
		out.push(tag.id() as u8);
		write_string(out, name);
		write_payload(out, tag);
	}
	out.push(TagID::End as u8);
}

fn write_list(out: &mut Vec<u8>, list: &ListTag) {
	out.push(list.element_id() as u8);
	out.extend((list.len() as i32).to_be_bytes());
	match list {
		ListTag::Empty => {}
		ListTag::Byte(items) => items.iter().for_each(|v| out.push(*v as u8)),
		ListTag::Short(items) => items.iter().for_each(|v| out.extend(v.to_be_bytes())),
		ListTag::Int(items) => items.iter().for_each(|v| out.extend(v.to_be_bytes())),
		ListTag::Long(items) => items.iter().for_each(|v| out.extend(v.to_be_bytes())),
		ListTag::Float(items) => items.iter().for_each(|v| out.extend(v.to_be_bytes())),
		ListTag::Double(items) => items.iter().for_each(|v| out.extend(v.to_be_bytes())),
		ListTag::ByteArray(items) => items.iter().for_each(|v| write_payload(out, &Tag::ByteArray(v.clone()))),
		ListTag::String(items) => items.iter().for_each(|v| write_string(out, v)),
		ListTag::List(items) => items.iter().for_each(|v| write_list(out, v)),
		ListTag::Compound(items) => items.iter().for_each(|v| write_compound(out, v)),
		ListTag::IntArray(items) => items.iter().for_each(|v| write_payload(out, &Tag::IntArray(v.clone()))),
		ListTag::LongArray(items) => items.iter().for_each(|v| write_payload(out, &Tag::LongArray(v.clone()))),
	}
}

fn write_payload(out: &mut Vec<u8>, tag: &Tag) {
	match tag {
		Tag::Byte(v) => out.push(*v as u8),
		Tag::Short(v) => out.extend(v.to_be_bytes()),
		Tag::Int(v) => out.extend(v.to_be_bytes()),
		Tag::Long(v) => out.extend(v.to_be_bytes()),
		Tag::Float(v) => out.extend(v.to_be_bytes()),
		Tag::Double(v) => out.extend(v.to_be_bytes()),
		Tag::ByteArray(v) => {
			out.extend((v.len() as i32).to_be_bytes());
			out.extend(v.iter().map(|b| *b as u8));
		}
		Tag::String(v) => write_string(out, v),
		Tag::List(list) => write_list(out, list),
		Tag::Compound(map) => write_compound(out, map),
		Tag::IntArray(v) => {
			out.extend((v.len() as i32).to_be_bytes());
			v.iter().for_each(|i| out.extend(i.to_be_bytes()));
		}
		Tag::LongArray(v) => {
			out.extend((v.len() as i32).to_be_bytes());
			v.iter().for_each(|i| out.extend(i.to_be_bytes()));
		}
	}
}

/// Encodes `tag` (which must be a compound) as a root tag named `name`.
pub fn encode_named(name: &str, tag: &Tag) -> Vec<u8> {
	let mut out = vec![TagID::Compound as u8];
	write_string(&mut out, name);
	match tag {
		Tag::Compound(map) => write_compound(&mut out, map),
		other => panic!("root must be a compound, got {:?}", other.id()),
	}
	out
}

pub fn gzip(bytes: &[u8]) -> Vec<u8> {
	let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
	encoder.write_all(bytes).unwrap();
	encoder.finish().unwrap()
}

pub fn zlib(bytes: &[u8]) -> Vec<u8> {
	let mut encoder = ZlibEncoder::new(Vec::new(), Compression::fast());
	encoder.write_all(bytes).unwrap();
	encoder.finish().unwrap()
}

/// Wraps compound tags into a list of compounds.
pub fn compound_list(items: Vec<Tag>) -> Tag {
	let maps = items.into_iter()
		.map(|item| match item {
			Tag::Compound(map) => map,
			other => panic!("expected a compound, got {:?}", other.id()),
		})
		.collect::<Vec<Map>>();
	Tag::List(ListTag::from(maps))
}
