use std::path::PathBuf;

use thiserror::Error;

/// The master error type.
///
/// Decoding errors are scoped to the smallest unit being decoded (one chunk,
/// one entity file). Callers that work on many units catch them and move on.
#[derive(Debug, Error)]
pub enum MapError {
	#[error("{0}")]
	Custom(String),
	#[error("IO Error: {0}")]
	IoError(#[from] std::io::Error),
	#[error("Malformed data: {0}")]
	MalformedFormat(String),
	#[error("Unsupported compression scheme: {0}")]
	UnsupportedCompression(u8),
	#[error("Unsupported Tag ID: {0}")]
	UnsupportedTagId(u8),
	#[error("Failed to decompress data: {0}")]
	Decompression(String),
	#[error("Resource not found: {0}")]
	MissingResource(PathBuf),
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl MapError {
	/// Shorthand for returning a [MapError::MalformedFormat].
	#[inline(always)]
	pub fn malformed<T, S: AsRef<str>>(msg: S) -> Result<T, Self> {
		Err(MapError::MalformedFormat(msg.as_ref().to_owned()))
	}

	#[inline(always)]
	pub fn custom<T, S: AsRef<str>>(msg: S) -> Result<T, Self> {
		Err(MapError::Custom(msg.as_ref().to_owned()))
	}

	/// Returns true for errors that mean "there is no data here" rather than
	/// "the data is broken".
	pub fn is_missing(&self) -> bool {
		match self {
			MapError::MissingResource(_) => true,
			MapError::IoError(err) => err.kind() == std::io::ErrorKind::NotFound,
			_ => false,
		}
	}
}

pub type MapResult<T> = Result<T, MapError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn missing_resource_is_not_an_error_kind() {
		assert!(MapError::MissingResource(PathBuf::from("r.0.0.mca")).is_missing());
		let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
		assert!(MapError::from(io).is_missing());
		assert!(!MapError::UnsupportedCompression(7).is_missing());
	}
}
