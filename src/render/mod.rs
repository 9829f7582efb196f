//! Turning world data (or just a seed) into map tiles.

pub mod colors;
pub mod hillshade;
pub mod tile;
pub mod preview;

pub use tile::{Tile, render_region_tile};
pub use preview::render_seed_preview_tile;
