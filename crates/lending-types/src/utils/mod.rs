//! Helpers shared by the lending crates.

pub mod decimal;
pub mod formatting;

pub use formatting::without_0x_prefix;
