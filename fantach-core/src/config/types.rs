//! Configuration type definitions
//!
//! Configuration is read once at start-up and is immutable afterwards.

use crate::time::{Micros, MAX_INTERVAL_US};

/// Which transitions of the tachometer signal count as a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgePolarity {
    /// Low-to-high transitions only
    Rising,
    /// High-to-low transitions only (open-collector fan tach pulls low)
    #[default]
    Falling,
    /// Every transition
    Both,
}

impl EdgePolarity {
    /// Number of ticks produced by one full sensor pulse
    pub const fn edges_per_pulse(self) -> u16 {
        match self {
            EdgePolarity::Rising | EdgePolarity::Falling => 1,
            EdgePolarity::Both => 2,
        }
    }
}

/// How ticks are converted into revolutions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EstimationMode {
    /// Measured full periods plus extrapolated partial periods at both
    /// interval boundaries
    #[default]
    Fractional,
    /// Plain ticks per interval, no partial-period information
    Counting,
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Interval length is zero
    ZeroInterval,
    /// Interval does not fit inside the clock's wraparound window
    IntervalTooLong,
    /// Ticks per revolution is zero
    ZeroTicksPerRevolution,
    /// Extrapolation needs at least two ticks to measure a period
    MinTicksTooSmall,
    /// Bounce period must be shorter than the interval
    BouncePeriodTooLong,
    /// Report baud rate is zero
    ZeroBaudRate,
}

/// Tachometer estimation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TachConfig {
    /// Reporting period length in µs
    pub interval_us: Micros,
    /// Signal edges per full mechanical revolution
    pub ticks_per_revolution: u16,
    /// Edges closer than this to the previous accepted edge are contact bounce (µs)
    pub bounce_period_us: Micros,
    /// Ticks required before boundary partial periods are extrapolated
    pub min_ticks_for_extrapolation: u32,
    /// Edge polarity delivered by the edge notification
    pub edge: EdgePolarity,
    /// Tick-to-revolution conversion
    pub mode: EstimationMode,
}

impl Default for TachConfig {
    fn default() -> Self {
        Self {
            interval_us: 1_000_000,
            ticks_per_revolution: 2,
            bounce_period_us: 2_000,
            min_ticks_for_extrapolation: 2,
            edge: EdgePolarity::Falling,
            mode: EstimationMode::Fractional,
        }
    }
}

impl TachConfig {
    /// Build a config for a sensor emitting `pulses_per_revolution` pulses,
    /// counted on `edge` transitions
    ///
    /// Standard PC fans emit two pulses per revolution; counting both edges
    /// doubles the tick rate (and the extrapolation granularity).
    pub fn for_sensor(pulses_per_revolution: u16, edge: EdgePolarity) -> Self {
        Self {
            ticks_per_revolution: pulses_per_revolution.saturating_mul(edge.edges_per_pulse()),
            edge,
            ..Self::default()
        }
    }

    /// Validate the operating bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval_us == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        if self.interval_us > MAX_INTERVAL_US {
            return Err(ConfigError::IntervalTooLong);
        }
        if self.ticks_per_revolution == 0 {
            return Err(ConfigError::ZeroTicksPerRevolution);
        }
        if self.min_ticks_for_extrapolation < 2 {
            return Err(ConfigError::MinTicksTooSmall);
        }
        if self.bounce_period_us >= self.interval_us {
            return Err(ConfigError::BouncePeriodTooLong);
        }
        Ok(())
    }

    /// Highest RPM the debounce filter lets through
    ///
    /// Any faster and real ticks start landing inside the bounce period.
    pub fn max_trackable_rpm(&self) -> f32 {
        if self.bounce_period_us == 0 {
            return f32::INFINITY;
        }
        crate::time::MICROS_PER_MINUTE
            / (self.bounce_period_us as f32 * self.ticks_per_revolution as f32)
    }
}

/// Reporting channel settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReportConfig {
    /// Serial baud rate for the report line
    pub baud_rate: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { baud_rate: 115_200 }
    }
}

/// Complete firmware configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FanConfig {
    pub tach: TachConfig,
    pub report: ReportConfig,
}

impl FanConfig {
    /// Validate all sections
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tach.validate()?;
        if self.report.baud_rate == 0 {
            return Err(ConfigError::ZeroBaudRate);
        }
        Ok(())
    }
}
