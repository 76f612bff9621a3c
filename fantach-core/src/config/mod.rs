//! Configuration types
//!
//! Board-agnostic configuration read once at start-up from the embedded
//! TOML file.

pub mod parse;
pub mod types;

pub use parse::{parse_config, ParseError, ParseErrorKind};
pub use types::*;
