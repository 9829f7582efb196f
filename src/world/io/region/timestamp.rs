
use std::io::Read;
use chrono::{DateTime, Utc};
use crate::{
	MapResult,
	for_each_int_type,
	ioext::*,
};

/// A 32-bit Unix timestamp: the last time a chunk was saved.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct Timestamp(u32);

impl Timestamp {
	pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
		DateTime::<Utc>::try_from(*self).ok()
	}

	pub fn seconds(&self) -> u32 {
		self.0
	}
}

macro_rules! __timestamp_impls {
	($type:ty) => {
		impl From<$type> for Timestamp {
			fn from(value: $type) -> Self {
				Self(value as u32)
			}
		}
	};
}

for_each_int_type!(__timestamp_impls);

impl Readable for Timestamp {
	fn read_from<R: Read>(reader: &mut R) -> MapResult<Self> {
		Ok(Self(reader.read_value()?))
	}
}

impl TryFrom<Timestamp> for DateTime<Utc> {
	type Error = ();

	fn try_from(value: Timestamp) -> Result<Self, Self::Error> {
		DateTime::<Utc>::from_timestamp(value.0 as i64, 0).ok_or(())
	}
}
