/// Shorthand way to create a Tag::Compound.
/// Example:
/// ```ignore
/// compound!{
///     ("Name", "minecraft:stone"),
///     (String::from("Y"), 4i8),
///     ("Inner", Tag::Byte(1))
/// }
/// ```
#[macro_export]
macro_rules! compound {
	($(($name:expr, $value:expr)),+$(,)?) => {
		$crate::nbt::tag::Tag::Compound(
			<$crate::nbt::Map as ::std::iter::FromIterator<(::std::string::String, $crate::nbt::tag::Tag)>>::from_iter([
				$(
					(::std::string::String::from($name), $crate::nbt::tag::Tag::from($value)),
				)+
			])
		)
	};
	() => {
		$crate::nbt::tag::Tag::Compound($crate::nbt::Map::new())
	};
}

/// Shorthand way to create a Tag::List.
/// Example:
/// ```ignore
/// list![1i32, 2, 3];
/// list!["One", "Two", "Three"];
/// ```
#[macro_export]
macro_rules! list {
	($($item:expr),+$(,)?) => {
		$crate::nbt::tag::Tag::List($crate::nbt::tag::ListTag::from(::std::vec![
			$(
				$item,
			)+
		]))
	};
	() => {
		$crate::nbt::tag::Tag::List($crate::nbt::tag::ListTag::Empty)
	};
}

pub use list;
pub use compound;
