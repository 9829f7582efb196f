use std::fmt::Display;

use sorted_vec::SortedVec;

use crate::{
	nbt::{tag::*, tagtype::Compound},
	MapResult, MapError,
};

/// Create a [BlockState].
///
/// Syntax:
/// ```ignore
/// blockstate!(air)
/// // Becomes
/// BlockState::new("minecraft:air", BlockProperties::none())
///
/// blockstate!(namespace:tile[prop1="string_literal", prop2=identifier, prop3=10])
/// // Becomes
/// BlockState::new("namespace:tile", BlockProperties::from([
/// 	("prop1".to_owned(), "string_literal".to_owned()),
/// 	("prop2".to_owned(), "identifier".to_owned()),
/// 	("prop3".to_owned(), "10".to_owned())
/// ]))
/// ```
#[macro_export]
macro_rules! blockstate {
	($id:ident) => {
		// We assume 'minecraft' namespace by default.
		$crate::blockstate!(minecraft:$id)
	};
	($id:ident [ $($name:tt = $value:tt),+$(,)? ]) => {
		$crate::blockstate!(minecraft:$id[ $($name = $value),+ ])
	};
	($namespace:ident:$id:ident) => {
		$crate::world::blockstate::BlockState::new(
			format!("{}:{}", stringify!($namespace), stringify!($id)),
			$crate::world::blockstate::BlockProperties::none()
		)
	};
	($namespace:ident:$id:ident [ $($name:tt = $value:tt),+$(,)? ]) => {
		$crate::world::blockstate::BlockState::new(
			format!("{}:{}", stringify!($namespace), stringify!($id)),
			$crate::world::blockstate::BlockProperties::from([
				$(
					(
						$crate::blockstate!(@decode_token; $name),
						$crate::blockstate!(@decode_token; $value)
					),
				)+
			])
		)
	};
	(@decode_token; $value:literal) => {
		$value.to_string()
	};
	(@decode_token; $value:ident) => {
		stringify!($value).to_owned()
	};
}

pub use crate::blockstate;

/// Block names that never count as a surface.
pub const AIR_BLOCKS: [&str; 3] = ["air", "cave_air", "void_air"];

#[derive(Debug, PartialEq, Eq, Hash, Clone, PartialOrd, Ord)]
pub struct BlockProperty {
	pub name: String,
	pub value: String,
}

impl BlockProperty {
	pub fn new<S1: AsRef<str>, S2: AsRef<str>>(name: S1, value: S2) -> Self {
		Self {
			name: name.as_ref().to_owned(),
			value: value.as_ref().to_owned(),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn value(&self) -> &str {
		&self.value
	}
}

impl<S1: AsRef<str>, S2: AsRef<str>> From<(S1, S2)> for BlockProperty {
	fn from(value: (S1, S2)) -> Self {
		BlockProperty::new(value.0, value.1)
	}
}

/// Properties are kept sorted so that two states with the same properties
/// compare equal no matter what order they were stored in.
#[derive(Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct BlockProperties {
	pub properties: Option<SortedVec<BlockProperty>>
}

impl BlockProperties {
	pub fn none() -> Self {
		Self {
			properties: None
		}
	}

	pub fn is_empty(&self) -> bool {
		self.properties.as_ref().map_or(true, |props| props.is_empty())
	}

	pub fn properties(&self) -> Option<&[BlockProperty]> {
		self.properties.as_ref().map(|props| props.as_slice())
	}

	pub fn get(&self, name: &str) -> Option<&str> {
		self.properties()?
			.iter()
			.find(|prop| prop.name == name)
			.map(BlockProperty::value)
	}
}

impl<T: Into<BlockProperty>, It: IntoIterator<Item = T>> From<It> for BlockProperties {
	fn from(value: It) -> Self {
		let properties = value.into_iter()
			.map(T::into)
			.collect::<Vec<BlockProperty>>();
		Self {
			properties: Some(SortedVec::from_unsorted(properties))
		}
	}
}

/// One palette entry: a namespaced block name plus optional properties.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct BlockState {
	name: String,
	properties: BlockProperties,
}

impl BlockState {
	pub fn new<S: AsRef<str>, P: Into<BlockProperties>>(name: S, properties: P) -> Self {
		Self {
			name: name.as_ref().to_owned(),
			properties: properties.into(),
		}
	}

	pub fn air() -> Self {
		blockstate!(air)
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// The name without its namespace (`minecraft:grass_block` -> `grass_block`).
	pub fn id(&self) -> &str {
		self.name
			.split_once(':')
			.map_or(self.name.as_str(), |(_, id)| id)
	}

	pub fn properties(&self) -> &BlockProperties {
		&self.properties
	}

	/// True for every air variant.
	pub fn is_air(&self) -> bool {
		AIR_BLOCKS.contains(&self.id())
	}

	/// Decodes a palette entry (`{Name: "...", Properties: {...}}`).
	/// Non-string property values are skipped rather than rejected.
	pub fn try_from_compound(map: &Compound) -> MapResult<Self> {
		let Some(Tag::String(name)) = map.get("Name") else {
			return MapError::malformed("block state without a Name");
		};
		let properties = match map.get("Properties") {
			Some(Tag::Compound(properties)) => BlockProperties::from(
				properties.iter().filter_map(|(key, value)| {
					value.as_str().map(|value| (key.as_str(), value))
				})
			),
			Some(_) => return MapError::malformed("block state Properties is not a compound"),
			None => BlockProperties::none(),
		};
		Ok(Self::new(name, properties))
	}
}

// Allows for creating BlockState from strings.
impl<S: AsRef<str>> From<S> for BlockState {
	fn from(value: S) -> Self {
		BlockState::new(value, BlockProperties::none())
	}
}

impl Display for BlockState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", &self.name)?;
		if !self.properties.is_empty() {
			write!(f, "{}", &self.properties)?;
		}
		Ok(())
	}
}

impl Display for BlockProperties {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "[")?;
		if let Some(props) = &self.properties {
			props.iter()
				.enumerate()
				.try_for_each(|(index, prop)| {
					if index > 0 {
						write!(f, ", ")?;
					}
					write!(f, "{}={}", &prop.name, &prop.value)
				})?;
		}
		write!(f, "]")
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::compound;

	#[test]
	fn blockstate_macro() {
		let state = blockstate!(oak_log[axis = y]);
		assert_eq!(state.name(), "minecraft:oak_log");
		assert_eq!(state.properties().get("axis"), Some("y"));
		assert_eq!(state.to_string(), "minecraft:oak_log[axis=y]");
		assert_eq!(BlockState::air().to_string(), "minecraft:air");
	}

	#[test]
	fn air_variants() {
		assert!(BlockState::air().is_air());
		assert!(BlockState::from("minecraft:cave_air").is_air());
		assert!(BlockState::from("minecraft:void_air").is_air());
		assert!(!BlockState::from("minecraft:stone").is_air());
		assert!(!BlockState::from("minecraft:air_block").is_air());
	}

	#[test]
	fn decode_palette_entry() {
		let tag = compound! {
			("Name", "minecraft:water"),
			("Properties", compound! {
				("level", "0"),
				("falling", "false"),
			}),
		};
		let state = BlockState::try_from_compound(tag.as_compound().unwrap()).unwrap();
		assert_eq!(state.id(), "water");
		assert_eq!(state.to_string(), "minecraft:water[falling=false, level=0]");
		assert_eq!(state, blockstate!(water[level = "0", falling = "false"]));

		let nameless = compound! { ("Properties", compound!()) };
		assert!(BlockState::try_from_compound(nameless.as_compound().unwrap()).is_err());
	}
}
