pub mod bit;
pub mod noise;
