use crate::{
	MapResult, MapError,
	ioext::{inflate_gzip, inflate_zlib, inflate_deflate},
};

/// Compression scheme byte stored in front of every chunk payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CompressionScheme {
	/// GZip compression is used.
	GZip = 1,
	/// ZLib compression is used.
	ZLib = 2,
}

impl CompressionScheme {
	/// Decompresses a chunk payload.
	/// Scheme 2 is zlib in practice, but a bare deflate stream is accepted too.
	pub fn decompress(self, bytes: &[u8]) -> MapResult<Vec<u8>> {
		match self {
			CompressionScheme::GZip => inflate_gzip(bytes),
			CompressionScheme::ZLib => inflate_zlib(bytes).or_else(|_| inflate_deflate(bytes)),
		}
	}
}

impl TryFrom<u8> for CompressionScheme {
	type Error = MapError;

	/// Everything but gzip and zlib is unsupported. That includes
	/// uncompressed payloads (3) and externally stored chunks (high bit set).
	fn try_from(value: u8) -> Result<Self, Self::Error> {
		match value {
			1 => Ok(Self::GZip),
			2 => Ok(Self::ZLib),
			unexpected => Err(MapError::UnsupportedCompression(unexpected)),
		}
	}
}
