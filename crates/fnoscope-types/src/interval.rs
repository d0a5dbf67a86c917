//! Historical bar interval definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Bar interval accepted by the historical data API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Interval {
    /// 1-minute bars.
    #[default]
    #[serde(rename = "m1")]
    Minute1,
    /// 3-minute bars.
    #[serde(rename = "m3")]
    Minute3,
    /// 5-minute bars.
    #[serde(rename = "m5")]
    Minute5,
    /// 10-minute bars.
    #[serde(rename = "m10")]
    Minute10,
    /// 15-minute bars.
    #[serde(rename = "m15")]
    Minute15,
    /// 30-minute bars.
    #[serde(rename = "m30")]
    Minute30,
    /// 1-hour bars.
    #[serde(rename = "h1")]
    Hour1,
    /// Daily bars.
    #[serde(rename = "d1")]
    Day1,
}

impl Interval {
    /// Returns the interval length in seconds, as sent on the wire.
    #[must_use]
    pub const fn seconds(&self) -> u32 {
        match self {
            Self::Minute1 => 60,
            Self::Minute3 => 180,
            Self::Minute5 => 300,
            Self::Minute10 => 600,
            Self::Minute15 => 900,
            Self::Minute30 => 1800,
            Self::Hour1 => 3600,
            Self::Day1 => 86400,
        }
    }

    /// Returns the interval as a string identifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Minute1 => "m1",
            Self::Minute3 => "m3",
            Self::Minute5 => "m5",
            Self::Minute10 => "m10",
            Self::Minute15 => "m15",
            Self::Minute30 => "m30",
            Self::Hour1 => "h1",
            Self::Day1 => "d1",
        }
    }

    /// Returns all available intervals.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Minute1,
            Self::Minute3,
            Self::Minute5,
            Self::Minute10,
            Self::Minute15,
            Self::Minute30,
            Self::Hour1,
            Self::Day1,
        ]
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Interval {
    type Err = IntervalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "m1" | "1m" | "minute" | "60" => Ok(Self::Minute1),
            "m3" | "3m" | "180" => Ok(Self::Minute3),
            "m5" | "5m" | "300" => Ok(Self::Minute5),
            "m10" | "10m" | "600" => Ok(Self::Minute10),
            "m15" | "15m" | "900" => Ok(Self::Minute15),
            "m30" | "30m" | "1800" => Ok(Self::Minute30),
            "h1" | "1h" | "hour" | "3600" => Ok(Self::Hour1),
            "d1" | "1d" | "day" | "daily" | "86400" => Ok(Self::Day1),
            _ => Err(IntervalParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid interval string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalParseError(String);

impl std::fmt::Display for IntervalParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid interval '{}', expected one of: m1, m3, m5, m10, m15, m30, h1, d1",
            self.0
        )
    }
}

impl std::error::Error for IntervalParseError {}
