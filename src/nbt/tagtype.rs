use crate::nbt::Map;
use crate::nbt::tag::{
	TagID,
	ListTag,
};

pub type Byte = i8;
pub type Short = i16;
pub type Int = i32;
pub type Long = i64;
pub type Float = f32;
pub type Double = f64;
pub type ByteArray = Vec<i8>;
pub type String = std::string::String; // Lol (for solidarity and isomorphism)
pub type List<T> = Vec<T>;
pub type Compound = Map;
pub type IntArray = Vec<i32>;
pub type LongArray = Vec<i64>;

/// Maps a Rust type onto the NBT tag id it is stored as.
pub trait TypeId {
	fn tag_id() -> TagID;

	/// The smallest number of payload bytes a value of this type can take.
	/// Used to reject declared lengths that can't possibly fit in a buffer.
	fn min_payload_size() -> usize;
}

macro_rules! typeid_impls {
	($($types:ty => $id:expr, $size:expr;)+) => {
		$(
			impl TypeId for $types {
				fn tag_id() -> TagID {
					$id
				}

				fn min_payload_size() -> usize {
					$size
				}
			}
		)+
	};
}

typeid_impls!(
	Byte => TagID::Byte, 1;
	Short => TagID::Short, 2;
	Int => TagID::Int, 4;
	Long => TagID::Long, 8;
	Float => TagID::Float, 4;
	Double => TagID::Double, 8;
	ByteArray => TagID::ByteArray, 4;
	String => TagID::String, 2;
	ListTag => TagID::List, 5;
	Compound => TagID::Compound, 1;
	IntArray => TagID::IntArray, 4;
	LongArray => TagID::LongArray, 4;
);

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ids_line_up() {
		assert_eq!(Byte::tag_id() as u8, 1);
		assert_eq!(Compound::tag_id() as u8, 10);
		assert_eq!(LongArray::tag_id() as u8, 12);
		assert_eq!(Long::min_payload_size(), 8);
	}
}
