//! Measurement units
//!
//! Drawings declare their own units; machining parameters carry the units the
//! generated program is written in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Drawing / machine measurement units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Millimeters
    #[default]
    #[serde(alias = "mm")]
    Millimeters,
    /// Inches
    #[serde(alias = "in")]
    Inches,
}

impl Units {
    /// Short unit label ("mm" or "in")
    pub fn label(self) -> &'static str {
        match self {
            Self::Millimeters => "mm",
            Self::Inches => "in",
        }
    }

    /// G-code word selecting these units
    pub fn gcode(self) -> &'static str {
        match self {
            Self::Millimeters => "G21",
            Self::Inches => "G20",
        }
    }

    /// Reconcile the units of several drawings.
    ///
    /// Mixed units fall back to millimeters; an empty input is millimeters too.
    pub fn reconcile<I: IntoIterator<Item = Units>>(units: I) -> Units {
        let mut iter = units.into_iter();
        let Some(first) = iter.next() else {
            return Units::Millimeters;
        };
        for units in iter {
            if units != first {
                tracing::info!("Using mixed units, falling back to millimeters");
                return Units::Millimeters;
            }
        }
        first
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mm" | "millimeters" | "metric" => Ok(Self::Millimeters),
            "in" | "inch" | "inches" | "imperial" => Ok(Self::Inches),
            _ => Err(format!("Unknown units: {}", s)),
        }
    }
}
