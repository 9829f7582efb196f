pub mod io;
pub mod blockstate;
pub mod schema;
pub mod chunk;
pub mod features;
pub mod players;
pub mod level;
