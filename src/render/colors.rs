//! Block colors for the top-down map.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::world::blockstate::BlockState;

pub type Rgb = [u8; 3];

/// Color of pixels with no resolved surface.
pub const BACKGROUND: Rgb = [0, 0, 0];

/// Color of blocks that neither the table nor a fallback rule knows.
pub const DEFAULT_COLOR: Rgb = [128, 128, 128];

static BLOCK_COLORS: Lazy<HashMap<&'static str, Rgb>> = Lazy::new(|| {
	HashMap::from([
		("grass_block", [86, 125, 70]),
		("short_grass", [94, 157, 52]),
		("grass", [94, 157, 52]),
		("tall_grass", [94, 157, 52]),
		("fern", [88, 140, 50]),
		("dirt", [134, 96, 67]),
		("coarse_dirt", [119, 85, 59]),
		("rooted_dirt", [144, 103, 76]),
		("podzol", [91, 63, 24]),
		("mycelium", [111, 99, 105]),
		("dirt_path", [148, 121, 65]),
		("farmland", [143, 102, 70]),
		("mud", [60, 57, 61]),
		("clay", [160, 166, 179]),
		("gravel", [131, 127, 126]),
		("stone", [128, 128, 128]),
		("cobblestone", [122, 122, 122]),
		("mossy_cobblestone", [110, 118, 94]),
		("granite", [149, 103, 85]),
		("diorite", [188, 188, 188]),
		("andesite", [136, 136, 136]),
		("deepslate", [80, 80, 82]),
		("tuff", [108, 109, 102]),
		("calcite", [223, 224, 220]),
		("bedrock", [85, 85, 85]),
		("sand", [219, 211, 160]),
		("sandstone", [216, 203, 155]),
		("red_sand", [190, 102, 33]),
		("red_sandstone", [186, 99, 29]),
		("terracotta", [152, 94, 67]),
		("water", [59, 86, 165]),
		("bubble_column", [59, 86, 165]),
		("seagrass", [43, 94, 150]),
		("tall_seagrass", [43, 94, 150]),
		("kelp", [40, 90, 140]),
		("kelp_plant", [40, 90, 140]),
		("lava", [207, 92, 20]),
		("ice", [145, 183, 253]),
		("packed_ice", [141, 180, 250]),
		("blue_ice", [116, 167, 253]),
		("snow", [249, 254, 254]),
		("snow_block", [249, 254, 254]),
		("powder_snow", [248, 253, 253]),
		("oak_leaves", [60, 120, 40]),
		("spruce_leaves", [55, 90, 55]),
		("birch_leaves", [80, 130, 55]),
		("jungle_leaves", [48, 130, 30]),
		("acacia_leaves", [80, 120, 35]),
		("dark_oak_leaves", [45, 100, 30]),
		("mangrove_leaves", [60, 110, 40]),
		("cherry_leaves", [229, 172, 194]),
		("azalea_leaves", [90, 117, 44]),
		("moss_block", [89, 109, 45]),
		("lily_pad", [32, 128, 48]),
		("cactus", [85, 127, 43]),
		("sugar_cane", [148, 192, 101]),
		("pumpkin", [198, 118, 24]),
		("melon", [111, 145, 30]),
		("netherrack", [111, 54, 52]),
		("soul_sand", [81, 62, 50]),
		("soul_soil", [75, 57, 46]),
		("basalt", [80, 81, 86]),
		("blackstone", [42, 36, 41]),
		("crimson_nylium", [130, 31, 31]),
		("warped_nylium", [43, 114, 101]),
		("glowstone", [171, 131, 84]),
		("magma_block", [142, 63, 31]),
		("end_stone", [219, 222, 158]),
		("obsidian", [15, 10, 24]),
		("oak_planks", [162, 130, 78]),
		("cobblestone_wall", [122, 122, 122]),
		("hay_block", [166, 136, 38]),
		("bookshelf", [117, 94, 59]),
		("torch", [255, 214, 90]),
		("glass", [200, 220, 230]),
	])
});

/// Substring rules for names the table doesn't list. Checked in order.
const FALLBACK_RULES: &[(&[&str], Rgb)] = &[
	(&["water"], [59, 86, 165]),
	(&["leaves"], [60, 120, 40]),
	(&["log", "wood", "stem", "hyphae"], [102, 81, 51]),
	(&["planks", "fence", "door", "stairs", "slab"], [162, 130, 78]),
	(&["grass", "fern", "bush", "sapling", "vine"], [94, 157, 52]),
	(&["flower", "tulip", "poppy", "dandelion", "orchid", "allium", "daisy"], [190, 160, 60]),
	(&["sand"], [219, 211, 160]),
	(&["snow"], [249, 254, 254]),
	(&["ice"], [145, 183, 253]),
	(&["deepslate"], [80, 80, 82]),
	(&["blackstone"], [42, 36, 41]),
	(&["stone", "cobble", "andesite", "ore"], [128, 128, 128]),
	(&["dirt", "mud"], [134, 96, 67]),
	(&["brick"], [150, 97, 83]),
	(&["terracotta"], [152, 94, 67]),
	(&["concrete"], [140, 140, 140]),
	(&["wool", "carpet"], [220, 220, 220]),
	(&["copper"], [192, 107, 79]),
	(&["nether"], [111, 54, 52]),
	(&["coral"], [200, 90, 120]),
	(&["mushroom"], [150, 110, 90]),
];

/// Color for a block id without namespace.
pub fn color_for_id(id: &str) -> Rgb {
	if let Some(color) = BLOCK_COLORS.get(id) {
		return *color;
	}
	FALLBACK_RULES.iter()
		.find(|(patterns, _)| patterns.iter().any(|pattern| id.contains(pattern)))
		.map_or(DEFAULT_COLOR, |(_, color)| *color)
}

pub fn block_color(state: &BlockState) -> Rgb {
	color_for_id(state.id())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn table_then_fallbacks() {
		assert_eq!(color_for_id("grass_block"), [86, 125, 70]);
		assert_eq!(block_color(&BlockState::from("minecraft:water")), [59, 86, 165]);
		// Not in the table, caught by the "log" rule.
		assert_eq!(color_for_id("pale_oak_log"), [102, 81, 51]);
		assert_eq!(color_for_id("stripped_cherry_wood"), [102, 81, 51]);
		assert_eq!(color_for_id("cyan_wool"), [220, 220, 220]);
		assert_eq!(color_for_id("definitely_not_a_block"), DEFAULT_COLOR);
	}
}
