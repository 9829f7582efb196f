pub mod nbt;
pub mod world;
pub mod ioext;
pub mod error;
pub mod math;
pub mod macros;
pub mod render;
pub mod cache;
pub mod job;
pub mod map;
pub mod config;

pub use flate2;

pub use error::MapError;
pub use error::MapResult;
pub use map::WorldMap;
pub use config::MapConfig;
pub use render::tile::{Tile, TILE_SIZE, TILE_BYTES};
