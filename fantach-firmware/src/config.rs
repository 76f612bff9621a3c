//! Configuration loading
//!
//! The configuration is compiled into the firmware from `tachometer.toml`
//! (validated by `build.rs`) and parsed once at start-up.

use defmt::*;

use fantach_core::config::{parse_config, FanConfig};

/// Embedded configuration
/// Edit tachometer.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../tachometer.toml");

/// Parse the embedded configuration, falling back to defaults
pub fn load_config() -> FanConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            // build.rs validates the file, so this only happens if the
            // build-time checks and the runtime parser disagree
            error!(
                "Failed to parse embedded config (line {}): {:?}",
                e.line, e.kind
            );
            error!("Using default configuration");
            FanConfig::default()
        }
    }
}
