//! Read-only NBT (named binary tag) support.
//!
//! Streams are big-endian and always start with a named compound. See
//! [io::decode] for the decoder and [lookup] for walking decoded trees.

pub mod tag;
pub mod tagtype;
pub mod io;
pub mod lookup;
pub mod macros;

#[cfg(test)]
pub mod testutil;

#[cfg(not(feature = "preserve_order"))]
pub type Map = std::collections::HashMap<String, tag::Tag>;

#[cfg(feature = "preserve_order")]
pub type Map = indexmap::IndexMap<String, tag::Tag>;

pub use tag::{Tag, ListTag, NamedTag, TagID};
pub use io::{decode, decode_compressed, read_file};
