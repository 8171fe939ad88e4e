pub mod commands;
pub mod compile;
pub mod config;
pub mod error;
pub mod freshness;
pub mod hash;
pub mod pack;
pub mod parser;
pub mod scan;

pub use error::Error;

/// ASCII art logo for kiln CLI
pub const LOGO: &str = "\
   ┬┌─┬┬  ┌┐┌
   ├┴┐││  │││
   ┴ ┴┴┴─┘┘└┘";
