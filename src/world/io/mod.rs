//! File formats found in a world directory.

pub mod region;
