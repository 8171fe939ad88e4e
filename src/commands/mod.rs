//! CLI command implementations.

pub mod compile;
pub mod packs;
pub mod status;
