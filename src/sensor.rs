use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of most recent readings reported by the history endpoint.
pub const HISTORY_LENGTH: usize = 15;

#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum SensorStatus {
    COLD,
    WARM,
    HOT,
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SensorStatus::COLD => "COLD",
            SensorStatus::WARM => "WARM",
            SensorStatus::HOT => "HOT",
        };
        f.write_str(name)
    }
}

impl FromStr for SensorStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "COLD" => Ok(SensorStatus::COLD),
            "WARM" => Ok(SensorStatus::WARM),
            "HOT" => Ok(SensorStatus::HOT),
            other => Err(format!("Unknown sensor status {:?}", other)),
        }
    }
}

/// Cold/hot cutoffs splitting readings into three bands.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub cold: f64,
    pub hot: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Thresholds { cold: 20.0, hot: 42.0 }
    }
}

impl Thresholds {
    pub fn new(cold: f64, hot: f64) -> Self {
        Thresholds { cold, hot }
    }

    /// `cold` must be strictly below `hot`. NaN on either side fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.cold < self.hot {
            Ok(())
        } else {
            Err(format!(
                "thresholds.cold ({}) should be lower than thresholds.hot ({})",
                self.cold, self.hot
            ))
        }
    }

    /// Readings equal to either cutoff fall into the middle band.
    pub fn classify(&self, reading: f64) -> SensorStatus {
        if reading > self.hot {
            SensorStatus::HOT
        } else if reading < self.cold {
            SensorStatus::COLD
        } else {
            SensorStatus::WARM
        }
    }
}
