//! Build script for fantach-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates tachometer.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Keep in sync with `fantach_core::time::MAX_INTERVAL_US`
const MAX_INTERVAL_US: i64 = (u32::MAX / 2) as i64;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate tachometer.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=tachometer.toml");

    let config_path = Path::new("tachometer.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: tachometer.toml not found!                               ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds tachometer.toml at build time.              ║\n\
            ║  Please create one in the fantach-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read tachometer.toml                           ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in tachometer.toml                   ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_tachometer(&config, &mut errors);
    validate_report(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid tachometer.toml                                  ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=tachometer.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Only the two known sections are allowed, and both must be tables
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(table) = config.as_table() else {
        errors.push("Top level must be a table".into());
        return;
    };

    for (name, value) in table {
        match name.as_str() {
            "tachometer" | "report" => {
                if !value.is_table() {
                    errors.push(format!("[{}] must be a table", name));
                }
            }
            other => errors.push(format!("Unknown section [{}]", other)),
        }
    }
}

/// Check keys and ranges of `[tachometer]`
fn validate_tachometer(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(tach) = config.get("tachometer").and_then(|v| v.as_table()) else {
        return;
    };

    for key in tach.keys() {
        if !matches!(
            key.as_str(),
            "interval_us"
                | "ticks_per_revolution"
                | "pulses_per_revolution"
                | "bounce_period_us"
                | "min_ticks_for_extrapolation"
                | "edge"
                | "mode"
        ) {
            errors.push(format!("Unknown key tachometer.{}", key));
        }
    }

    let interval = int_in_range(tach, "interval_us", 1, MAX_INTERVAL_US, errors);
    int_in_range(tach, "ticks_per_revolution", 1, u16::MAX as i64, errors);
    int_in_range(tach, "pulses_per_revolution", 1, u16::MAX as i64, errors);
    if tach.contains_key("ticks_per_revolution") && tach.contains_key("pulses_per_revolution") {
        errors.push("Set ticks_per_revolution or pulses_per_revolution, not both".into());
    }
    let bounce = int_in_range(tach, "bounce_period_us", 0, MAX_INTERVAL_US, errors);
    int_in_range(tach, "min_ticks_for_extrapolation", 2, u32::MAX as i64, errors);

    // Defaults: 1s interval, 2000us bounce
    let interval = interval.unwrap_or(1_000_000);
    let bounce = bounce.unwrap_or(2_000);
    if bounce >= interval {
        errors.push(format!(
            "bounce_period_us ({}) must be below interval_us ({})",
            bounce, interval
        ));
    }

    string_one_of(tach, "edge", &["rising", "falling", "both"], errors);
    string_one_of(tach, "mode", &["fractional", "counting"], errors);
}

/// Check keys and ranges of `[report]`
fn validate_report(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(report) = config.get("report").and_then(|v| v.as_table()) else {
        return;
    };

    for key in report.keys() {
        if key != "baud_rate" {
            errors.push(format!("Unknown key report.{}", key));
        }
    }

    int_in_range(report, "baud_rate", 1, u32::MAX as i64, errors);
}

/// Read an optional integer key and check its range
fn int_in_range(
    table: &toml::map::Map<String, toml::Value>,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> Option<i64> {
    let value = table.get(key)?;
    match value.as_integer() {
        Some(v) if (min..=max).contains(&v) => Some(v),
        Some(v) => {
            errors.push(format!("{} = {} is outside {}..={}", key, v, min, max));
            None
        }
        None => {
            errors.push(format!("{} must be an integer", key));
            None
        }
    }
}

/// Read an optional string key and check it against the allowed values
fn string_one_of(
    table: &toml::map::Map<String, toml::Value>,
    key: &str,
    allowed: &[&str],
    errors: &mut Vec<String>,
) {
    let Some(value) = table.get(key) else {
        return;
    };
    match value.as_str() {
        Some(s) if allowed.contains(&s) => {}
        Some(s) => errors.push(format!(
            "{} = \"{}\" must be one of {}",
            key,
            s,
            allowed.join(", ")
        )),
        None => errors.push(format!("{} must be a string", key)),
    }
}
