//! Minimal TOML parser for the tachometer configuration
//!
//! Handles only the subset the firmware's embedded `tachometer.toml` uses.
//! It does NOT support all of TOML.
//!
//! Supported:
//! - `[section]` headers
//! - `key = value` pairs (integer, string)
//! - Integers with `_` digit separators (`1_000_000`)
//! - Comments, full-line and trailing (`# ...`)
//! - `pulses_per_revolution` as an alternative to `ticks_per_revolution`
//!
//! Unknown sections and keys are rejected rather than ignored, so a typo
//! cannot silently leave a default in place.

use heapless::String;

use super::types::{ConfigError, EdgePolarity, EstimationMode, FanConfig, TachConfig};

/// Longest integer literal accepted (digits plus separators)
const MAX_INT_LEN: usize = 24;

/// What went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseErrorKind {
    /// Line is neither a header, a key/value pair nor a comment
    Malformed,
    /// Section header names no known section
    UnknownSection,
    /// Key is not valid in its section
    UnknownKey,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Both `ticks_per_revolution` and `pulses_per_revolution` are set
    ConflictingKeys,
    /// Values parsed, but the resulting config is invalid
    Invalid(ConfigError),
}

/// Parse error with its 1-based line number (0 for whole-file validation)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParseError {
    /// 1-based line of the offending entry, 0 for whole-file validation
    pub line: usize,
    /// What went wrong
    pub kind: ParseErrorKind,
}

impl ParseError {
    fn at(line: usize, kind: ParseErrorKind) -> Self {
        Self { line, kind }
    }
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Tachometer,
    Report,
}

/// Revolution scaling as written in the file
#[derive(Debug, Clone, Copy, Default)]
struct RevolutionKeys {
    /// Line of an explicit `ticks_per_revolution`
    ticks_line: Option<usize>,
    /// `pulses_per_revolution` and its line
    pulses: Option<(usize, u16)>,
}

/// Parse TOML configuration into a validated [`FanConfig`]
///
/// Keys that are absent keep their defaults. `pulses_per_revolution`
/// describes the sensor; the tick scaling is derived from it and the
/// `edge` setting once the whole file has been read.
pub fn parse_config(input: &str) -> Result<FanConfig, ParseError> {
    let mut config = FanConfig::default();
    let mut section = Section::Root;
    let mut revolution = RevolutionKeys::default();

    for (index, raw) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = strip_comment(raw).trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            if !line.ends_with(']') {
                return Err(ParseError::at(line_no, ParseErrorKind::Malformed));
            }
            section = parse_section_header(&line[1..line.len() - 1])
                .ok_or(ParseError::at(line_no, ParseErrorKind::UnknownSection))?;
            continue;
        }

        let (key, value) =
            parse_key_value(line).ok_or(ParseError::at(line_no, ParseErrorKind::Malformed))?;

        if section == Section::Tachometer && key == "pulses_per_revolution" {
            let pulses = parse_int(value).map_err(|kind| ParseError::at(line_no, kind))?;
            revolution.pulses = Some((line_no, pulses));
            continue;
        }
        if section == Section::Tachometer && key == "ticks_per_revolution" {
            revolution.ticks_line = Some(line_no);
        }

        apply_value(section, key, value, &mut config).map_err(|kind| ParseError::at(line_no, kind))?;
    }

    if let Some((pulses_line, pulses)) = revolution.pulses {
        if let Some(ticks_line) = revolution.ticks_line {
            let line = pulses_line.max(ticks_line);
            return Err(ParseError::at(line, ParseErrorKind::ConflictingKeys));
        }
        let sensor = TachConfig::for_sensor(pulses, config.tach.edge);
        config.tach.ticks_per_revolution = sensor.ticks_per_revolution;
    }

    config
        .validate()
        .map_err(|e| ParseError::at(0, ParseErrorKind::Invalid(e)))?;

    Ok(config)
}

fn parse_section_header(header: &str) -> Option<Section> {
    match header.trim() {
        "tachometer" => Some(Section::Tachometer),
        "report" => Some(Section::Report),
        _ => None,
    }
}

/// Cut a trailing comment, unless the `#` sits inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut FanConfig,
) -> Result<(), ParseErrorKind> {
    match section {
        Section::Root => return Err(ParseErrorKind::UnknownKey),
        Section::Tachometer => {
            let tach = &mut config.tach;
            match key {
                "interval_us" => tach.interval_us = parse_int(value)?,
                "ticks_per_revolution" => tach.ticks_per_revolution = parse_int(value)?,
                "bounce_period_us" => tach.bounce_period_us = parse_int(value)?,
                "min_ticks_for_extrapolation" => {
                    tach.min_ticks_for_extrapolation = parse_int(value)?
                }
                "edge" => tach.edge = parse_edge(parse_string(value)?)?,
                "mode" => tach.mode = parse_mode(parse_string(value)?)?,
                _ => return Err(ParseErrorKind::UnknownKey),
            }
        }
        Section::Report => match key {
            "baud_rate" => config.report.baud_rate = parse_int(value)?,
            _ => return Err(ParseErrorKind::UnknownKey),
        },
    }
    Ok(())
}

fn parse_string(value: &str) -> Result<&str, ParseErrorKind> {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        Ok(&value[1..value.len() - 1])
    } else {
        Err(ParseErrorKind::InvalidValue)
    }
}

/// Parse an unsigned integer, allowing `_` between digits
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseErrorKind> {
    if value.starts_with('_') || value.ends_with('_') || value.contains("__") {
        return Err(ParseErrorKind::InvalidValue);
    }

    let mut digits: String<MAX_INT_LEN> = String::new();
    for c in value.chars().filter(|c| *c != '_') {
        if !c.is_ascii_digit() {
            return Err(ParseErrorKind::InvalidValue);
        }
        digits.push(c).map_err(|_| ParseErrorKind::InvalidValue)?;
    }

    digits.parse().map_err(|_| ParseErrorKind::InvalidValue)
}

fn parse_edge(value: &str) -> Result<EdgePolarity, ParseErrorKind> {
    match value {
        "rising" => Ok(EdgePolarity::Rising),
        "falling" => Ok(EdgePolarity::Falling),
        "both" => Ok(EdgePolarity::Both),
        _ => Err(ParseErrorKind::InvalidValue),
    }
}

fn parse_mode(value: &str) -> Result<EstimationMode, ParseErrorKind> {
    match value {
        "fractional" => Ok(EstimationMode::Fractional),
        "counting" => Ok(EstimationMode::Counting),
        _ => Err(ParseErrorKind::InvalidValue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let input = r#"
# Fan tachometer settings
[tachometer]
interval_us = 500_000          # half-second reports
ticks_per_revolution = 4
bounce_period_us = 1_500
min_ticks_for_extrapolation = 3
edge = "both"
mode = "counting"

[report]
baud_rate = 57600
"#;

        let config = parse_config(input).unwrap();
        assert_eq!(config.tach.interval_us, 500_000);
        assert_eq!(config.tach.ticks_per_revolution, 4);
        assert_eq!(config.tach.bounce_period_us, 1_500);
        assert_eq!(config.tach.min_ticks_for_extrapolation, 3);
        assert_eq!(config.tach.edge, EdgePolarity::Both);
        assert_eq!(config.tach.mode, EstimationMode::Counting);
        assert_eq!(config.report.baud_rate, 57_600);
    }

    #[test]
    fn test_missing_keys_keep_defaults() {
        let config = parse_config("[tachometer]\nticks_per_revolution = 1\n").unwrap();
        assert_eq!(config.tach.ticks_per_revolution, 1);
        assert_eq!(config.tach.interval_us, 1_000_000);
        assert_eq!(config.report, FanConfig::default().report);

        assert_eq!(parse_config("").unwrap(), FanConfig::default());
    }

    #[test]
    fn test_unknown_section_and_key() {
        let err = parse_config("[fan]\n").unwrap_err();
        assert_eq!(err, ParseError::at(1, ParseErrorKind::UnknownSection));

        let err = parse_config("[tachometer]\n\ninterval = 5\n").unwrap_err();
        assert_eq!(err, ParseError::at(3, ParseErrorKind::UnknownKey));

        let err = parse_config("baud_rate = 9600\n").unwrap_err();
        assert_eq!(err, ParseError::at(1, ParseErrorKind::UnknownKey));
    }

    #[test]
    fn test_invalid_values() {
        let err = parse_config("[tachometer]\nedge = \"sideways\"\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidValue);

        let err = parse_config("[tachometer]\nedge = falling\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidValue);

        let err = parse_config("[tachometer]\ninterval_us = -5\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidValue);

        let err = parse_config("[tachometer]\ninterval_us = 1__000\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidValue);

        // Overflows u16
        let err = parse_config("[tachometer]\nticks_per_revolution = 70000\n").unwrap_err();
        assert_eq!(err, ParseError::at(2, ParseErrorKind::InvalidValue));
    }

    #[test]
    fn test_malformed_lines() {
        let err = parse_config("[tachometer\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::Malformed);

        let err = parse_config("[tachometer]\ninterval_us\n").unwrap_err();
        assert_eq!(err, ParseError::at(2, ParseErrorKind::Malformed));
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let err = parse_config("[tachometer]\nmin_ticks_for_extrapolation = 1\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::at(0, ParseErrorKind::Invalid(ConfigError::MinTicksTooSmall))
        );
    }

    #[test]
    fn test_pulses_scale_with_edge_setting() {
        // Edge may follow the pulse count; scaling is applied at the end
        let config =
            parse_config("[tachometer]\npulses_per_revolution = 2\nedge = \"both\"\n").unwrap();
        assert_eq!(config.tach.ticks_per_revolution, 4);
        assert_eq!(config.tach.edge, EdgePolarity::Both);

        let config = parse_config("[tachometer]\npulses_per_revolution = 3\n").unwrap();
        assert_eq!(config.tach.ticks_per_revolution, 3);
    }

    #[test]
    fn test_pulses_and_ticks_conflict() {
        let input = "[tachometer]\nticks_per_revolution = 2\npulses_per_revolution = 2\n";
        let err = parse_config(input).unwrap_err();
        assert_eq!(err, ParseError::at(3, ParseErrorKind::ConflictingKeys));

        let err = parse_config("[tachometer]\npulses_per_revolution = 0\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::at(0, ParseErrorKind::Invalid(ConfigError::ZeroTicksPerRevolution))
        );
    }

    #[test]
    fn test_strip_comment_respects_strings() {
        assert_eq!(strip_comment("edge = \"a#b\" # note"), "edge = \"a#b\" ");
        assert_eq!(strip_comment("# whole line"), "");
    }
}
