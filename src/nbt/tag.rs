use crate::nbt::Map;
use crate::nbt::tagtype::*;

/// The id byte that precedes every tag in an NBT stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TagID {
	End = 0,
	Byte = 1,
	Short = 2,
	Int = 3,
	Long = 4,
	Float = 5,
	Double = 6,
	ByteArray = 7,
	String = 8,
	List = 9,
	Compound = 10,
	IntArray = 11,
	LongArray = 12,
}

impl TryFrom<u8> for TagID {
	type Error = u8;

	fn try_from(value: u8) -> Result<Self, Self::Error> {
		Ok(match value {
			0 => TagID::End,
			1 => TagID::Byte,
			2 => TagID::Short,
			3 => TagID::Int,
			4 => TagID::Long,
			5 => TagID::Float,
			6 => TagID::Double,
			7 => TagID::ByteArray,
			8 => TagID::String,
			9 => TagID::List,
			10 => TagID::Compound,
			11 => TagID::IntArray,
			12 => TagID::LongArray,
			unknown => return Err(unknown),
		})
	}
}

/// A single NBT value.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
	Byte(Byte),
	Short(Short),
	Int(Int),
	Long(Long),
	Float(Float),
	Double(Double),
	ByteArray(ByteArray),
	String(String),
	List(ListTag),
	Compound(Compound),
	IntArray(IntArray),
	LongArray(LongArray),
}

/// A homogeneous list. Every element shares the element type declared once
/// in the stream, so the list is stored as one vector of that type.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ListTag {
	#[default]
	Empty,
	Byte(List<Byte>),
	Short(List<Short>),
	Int(List<Int>),
	Long(List<Long>),
	Float(List<Float>),
	Double(List<Double>),
	ByteArray(List<ByteArray>),
	String(List<String>),
	List(List<ListTag>),
	Compound(List<Compound>),
	IntArray(List<IntArray>),
	LongArray(List<LongArray>),
}

/// The root of an NBT stream: a compound with a (possibly empty) name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedTag {
	pub name: String,
	pub tag: Tag,
}

impl NamedTag {
	pub fn new<S: Into<String>>(name: S, tag: Tag) -> Self {
		Self {
			name: name.into(),
			tag,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn tag(&self) -> &Tag {
		&self.tag
	}

	pub fn take_tag(self) -> Tag {
		self.tag
	}
}

impl Tag {
	pub fn id(&self) -> TagID {
		match self {
			Tag::Byte(_) => TagID::Byte,
			Tag::Short(_) => TagID::Short,
			Tag::Int(_) => TagID::Int,
			Tag::Long(_) => TagID::Long,
			Tag::Float(_) => TagID::Float,
			Tag::Double(_) => TagID::Double,
			Tag::ByteArray(_) => TagID::ByteArray,
			Tag::String(_) => TagID::String,
			Tag::List(_) => TagID::List,
			Tag::Compound(_) => TagID::Compound,
			Tag::IntArray(_) => TagID::IntArray,
			Tag::LongArray(_) => TagID::LongArray,
		}
	}

	/// Looks up a key if this tag is a compound.
	pub fn get(&self, key: &str) -> Option<&Tag> {
		match self {
			Tag::Compound(map) => map.get(key),
			_ => None,
		}
	}

	/// Integer value widened to i64. Floating point tags are not converted.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Tag::Byte(value) => Some(*value as i64),
			Tag::Short(value) => Some(*value as i64),
			Tag::Int(value) => Some(*value as i64),
			Tag::Long(value) => Some(*value),
			_ => None,
		}
	}

	/// Integer value if it fits into an i32.
	pub fn as_i32(&self) -> Option<i32> {
		self.as_i64().and_then(|value| i32::try_from(value).ok())
	}

	/// Any numeric value as f64.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Tag::Float(value) => Some(*value as f64),
			Tag::Double(value) => Some(*value),
			other => other.as_i64().map(|value| value as f64),
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Tag::String(value) => Some(value.as_str()),
			_ => None,
		}
	}

	pub fn as_compound(&self) -> Option<&Compound> {
		match self {
			Tag::Compound(map) => Some(map),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&ListTag> {
		match self {
			Tag::List(list) => Some(list),
			_ => None,
		}
	}

	pub fn as_int_array(&self) -> Option<&[i32]> {
		match self {
			Tag::IntArray(array) => Some(array),
			_ => None,
		}
	}

	pub fn as_long_array(&self) -> Option<&[i64]> {
		match self {
			Tag::LongArray(array) => Some(array),
			_ => None,
		}
	}
}

impl ListTag {
	/// The element type id. An empty list reports [TagID::End].
	pub fn element_id(&self) -> TagID {
		match self {
			ListTag::Empty => TagID::End,
			ListTag::Byte(_) => Byte::tag_id(),
			ListTag::Short(_) => Short::tag_id(),
			ListTag::Int(_) => Int::tag_id(),
			ListTag::Long(_) => Long::tag_id(),
			ListTag::Float(_) => Float::tag_id(),
			ListTag::Double(_) => Double::tag_id(),
			ListTag::ByteArray(_) => ByteArray::tag_id(),
			ListTag::String(_) => String::tag_id(),
			ListTag::List(_) => ListTag::tag_id(),
			ListTag::Compound(_) => Compound::tag_id(),
			ListTag::IntArray(_) => IntArray::tag_id(),
			ListTag::LongArray(_) => LongArray::tag_id(),
		}
	}

	pub fn len(&self) -> usize {
		match self {
			ListTag::Empty => 0,
			ListTag::Byte(list) => list.len(),
			ListTag::Short(list) => list.len(),
			ListTag::Int(list) => list.len(),
			ListTag::Long(list) => list.len(),
			ListTag::Float(list) => list.len(),
			ListTag::Double(list) => list.len(),
			ListTag::ByteArray(list) => list.len(),
			ListTag::String(list) => list.len(),
			ListTag::List(list) => list.len(),
			ListTag::Compound(list) => list.len(),
			ListTag::IntArray(list) => list.len(),
			ListTag::LongArray(list) => list.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// The elements as compounds. Lists of any other type yield an empty slice.
	pub fn compounds(&self) -> &[Compound] {
		match self {
			ListTag::Compound(list) => list,
			_ => &[],
		}
	}

	/// Element `index` as a number, for lists of numeric type.
	pub fn number_at(&self, index: usize) -> Option<f64> {
		match self {
			ListTag::Byte(list) => list.get(index).map(|v| *v as f64),
			ListTag::Short(list) => list.get(index).map(|v| *v as f64),
			ListTag::Int(list) => list.get(index).map(|v| *v as f64),
			ListTag::Long(list) => list.get(index).map(|v| *v as f64),
			ListTag::Float(list) => list.get(index).map(|v| *v as f64),
			ListTag::Double(list) => list.get(index).copied(),
			_ => None,
		}
	}
}

macro_rules! __tag_from_impls {
	($($type:ty => $variant:ident;)+) => {
		$(
			impl From<$type> for Tag {
				fn from(value: $type) -> Self {
					Tag::$variant(value)
				}
			}

			impl From<Vec<$type>> for ListTag {
				fn from(value: Vec<$type>) -> Self {
					if value.is_empty() {
						ListTag::Empty
					} else {
						ListTag::$variant(value)
					}
				}
			}
		)+
	};
}

__tag_from_impls!(
	Byte => Byte;
	Short => Short;
	Int => Int;
	Long => Long;
	Float => Float;
	Double => Double;
	ByteArray => ByteArray;
	String => String;
	ListTag => List;
	Compound => Compound;
	IntArray => IntArray;
	LongArray => LongArray;
);

impl From<&str> for Tag {
	fn from(value: &str) -> Self {
		Tag::String(value.to_owned())
	}
}

impl From<Vec<&str>> for ListTag {
	fn from(value: Vec<&str>) -> Self {
		value.into_iter().map(str::to_owned).collect::<Vec<String>>().into()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn numeric_widening() {
		assert_eq!(Tag::Byte(-3).as_i64(), Some(-3));
		assert_eq!(Tag::Short(300).as_i32(), Some(300));
		assert_eq!(Tag::Long(i64::MAX).as_i32(), None);
		assert_eq!(Tag::Float(1.5).as_f64(), Some(1.5));
		assert_eq!(Tag::Float(1.5).as_i64(), None);
		assert_eq!(Tag::from("x").as_i64(), None);
	}

	#[test]
	fn list_element_ids() {
		assert_eq!(ListTag::Empty.element_id(), TagID::End);
		assert_eq!(ListTag::from(vec![1i32, 2]).element_id(), TagID::Int);
		assert_eq!(ListTag::from(Vec::<i64>::new()), ListTag::Empty);
		assert_eq!(ListTag::from(vec![1.0f64, 2.0]).number_at(1), Some(2.0));
	}

	#[test]
	fn tag_ids_round_trip_through_u8() {
		for id in 0u8..=12 {
			assert_eq!(TagID::try_from(id).map(|tag| tag as u8), Ok(id));
		}
		assert_eq!(TagID::try_from(13), Err(13));
	}
}
