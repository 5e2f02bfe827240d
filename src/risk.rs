use serde::Serialize;
use std::fmt;

use crate::error::{CcvError, Result};

pub const DEFAULT_VERY_LOW:  u32 = 10;
pub const DEFAULT_LOW:       u32 = 15;
pub const DEFAULT_MEDIUM:    u32 = 20;
pub const DEFAULT_HIGH:      u32 = 25;
pub const DEFAULT_VERY_HIGH: u32 = 30;
pub const DEFAULT_CRITICAL:  u32 = 35;

/// The six risk tiers, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
    Critical,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 6] = [
        RiskLevel::VeryLow,
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::VeryHigh,
        RiskLevel::Critical,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RiskLevel::VeryLow  => "Very Low Risk",
            RiskLevel::Low      => "Low Risk",
            RiskLevel::Medium   => "Medium Risk",
            RiskLevel::High     => "High Risk",
            RiskLevel::VeryHigh => "Very High Risk",
            RiskLevel::Critical => "Critical Risk",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            RiskLevel::VeryLow  => "#90EE90",
            RiskLevel::Low      => "#47d147",
            RiskLevel::Medium   => "#ffd700",
            RiskLevel::High     => "#ffa64d",
            RiskLevel::VeryHigh => "#ff4d4d",
            RiskLevel::Critical => "#8b0000",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One classification tier. `max` is inclusive; `None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskBand {
    pub level: RiskLevel,
    pub min: u32,
    pub max: Option<u32>,
}

impl RiskBand {
    pub fn name(&self) -> &'static str {
        self.level.name()
    }

    pub fn color(&self) -> &'static str {
        self.level.color()
    }

    /// Half-open on the upper side (`min <= score < max + 1`), so fractional
    /// scores between two integer bands still land in exactly one of them.
    pub fn contains(&self, score: f64) -> bool {
        if score < f64::from(self.min) {
            return false;
        }
        match self.max {
            Some(max) => score < f64::from(max) + 1.0,
            None => true,
        }
    }
}

/// Lower bounds of the six bands. Must be strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskThresholds {
    pub very_low: u32,
    pub low: u32,
    pub medium: u32,
    pub high: u32,
    pub very_high: u32,
    pub critical: u32,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        RiskThresholds {
            very_low:  DEFAULT_VERY_LOW,
            low:       DEFAULT_LOW,
            medium:    DEFAULT_MEDIUM,
            high:      DEFAULT_HIGH,
            very_high: DEFAULT_VERY_HIGH,
            critical:  DEFAULT_CRITICAL,
        }
    }
}

impl RiskThresholds {
    fn as_array(&self) -> [u32; 6] {
        [self.very_low, self.low, self.medium, self.high, self.very_high, self.critical]
    }

    /// Checks adjacent pairs lowest first and reports the first one out of order.
    pub fn validate(&self) -> Result<()> {
        let values = self.as_array();
        for i in 0..values.len() - 1 {
            let (lo, hi) = (values[i], values[i + 1]);
            if lo >= hi {
                return Err(CcvError::config(format!(
                    "{} threshold ({lo}) must be less than {} threshold ({hi})",
                    RiskLevel::ALL[i].name(),
                    RiskLevel::ALL[i + 1].name(),
                )));
            }
        }
        Ok(())
    }

    /// Builds the six bands in ascending order. Call [`validate`](Self::validate) first.
    pub fn bands(&self) -> Vec<RiskBand> {
        let values = self.as_array();
        RiskLevel::ALL
            .iter()
            .enumerate()
            .map(|(i, &level)| RiskBand {
                level,
                min: values[i],
                max: values.get(i + 1).map(|next| next.saturating_sub(1)),
            })
            .collect()
    }
}
