pub mod candidate;
pub mod segment;
