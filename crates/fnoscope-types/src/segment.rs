//! Exchange segments.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Exchange segment a historical data request is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    /// NSE cash market.
    #[serde(rename = "NSE_EQ")]
    NseEquity,
    /// NSE futures and options.
    #[serde(rename = "NSE_FO")]
    NseFno,
    /// BSE cash market.
    #[serde(rename = "BSE_EQ")]
    BseEquity,
    /// BSE futures and options.
    #[serde(rename = "BSE_FO")]
    BseFno,
    /// MCX commodity derivatives.
    #[serde(rename = "MCX_FO")]
    McxFno,
}

impl Segment {
    /// Returns the wire code of the segment.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NseEquity => "NSE_EQ",
            Self::NseFno => "NSE_FO",
            Self::BseEquity => "BSE_EQ",
            Self::BseFno => "BSE_FO",
            Self::McxFno => "MCX_FO",
        }
    }

    /// Returns true for derivative segments, whose bars carry open interest.
    #[must_use]
    pub const fn is_derivative(&self) -> bool {
        matches!(self, Self::NseFno | Self::BseFno | Self::McxFno)
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Segment {
    type Err = SegmentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "NSE_EQ" | "NSE" => Ok(Self::NseEquity),
            "NSE_FO" | "NFO" => Ok(Self::NseFno),
            "BSE_EQ" | "BSE" => Ok(Self::BseEquity),
            "BSE_FO" | "BFO" => Ok(Self::BseFno),
            "MCX_FO" | "MCX" => Ok(Self::McxFno),
            _ => Err(SegmentParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid segment string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid segment '{0}', expected one of: NSE_EQ, NSE_FO, BSE_EQ, BSE_FO, MCX_FO")]
pub struct SegmentParseError(String);
