//! Walking decoded trees by key path.

use super::tag::Tag;
use super::tagtype::Compound;

/// A key path into nested compounds, such as `&["Level", "Sections"]`.
pub type TagPath<'p> = &'p [&'p str];

/// Follows `path` through nested compounds.
/// An empty path returns the tag itself.
pub fn get_path<'a>(tag: &'a Tag, path: TagPath<'_>) -> Option<&'a Tag> {
	path.iter().try_fold(tag, |node, key| node.get(key))
}

/// Tries each path in order and returns the first that resolves.
pub fn first_of<'a>(tag: &'a Tag, paths: &[TagPath<'_>]) -> Option<&'a Tag> {
	paths.iter().find_map(|path| get_path(tag, path))
}

/// Like [first_of], but keeps looking until a path resolves to something
/// `convert` accepts. Useful when one spelling exists with the wrong type.
pub fn first_map<'a, T>(
	tag: &'a Tag,
	paths: &[TagPath<'_>],
	convert: impl Fn(&'a Tag) -> Option<T>,
) -> Option<T> {
	paths.iter()
		.filter_map(|path| get_path(tag, path))
		.find_map(convert)
}

/// [get_path] starting from a bare compound, such as a list element.
/// The path must not be empty.
pub fn get_path_in<'a>(map: &'a Compound, path: TagPath<'_>) -> Option<&'a Tag> {
	let (first, rest) = path.split_first()?;
	get_path(map.get(*first)?, rest)
}

/// [first_map] starting from a bare compound.
pub fn first_map_in<'a, T>(
	map: &'a Compound,
	paths: &[TagPath<'_>],
	convert: impl Fn(&'a Tag) -> Option<T>,
) -> Option<T> {
	paths.iter()
		.filter_map(|path| get_path_in(map, path))
		.find_map(convert)
}
