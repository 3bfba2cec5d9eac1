//! Scenario runner for parameter sweeps
//!
//! Holds a base configuration and re-runs the whole simulation for each
//! variation. Runs are independent, so sweeps execute in parallel.

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;

use crate::config::SimulationConfig;
use crate::error::ConfigError;
use crate::projection::{simulate, SimulationResult};

/// A single configuration field that a sweep varies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepParameter {
    TotalSows,
    PigletsPerCycle,
    PigletMortality,
    AbortionRate,
    SalePrice,
    SowFeedPrice,
    GrowerFeedPrice,
    Fcr,
    LoanAmount,
    InterestRate,
    Months,
}

impl SweepParameter {
    pub const ALL: [SweepParameter; 11] = [
        SweepParameter::TotalSows,
        SweepParameter::PigletsPerCycle,
        SweepParameter::PigletMortality,
        SweepParameter::AbortionRate,
        SweepParameter::SalePrice,
        SweepParameter::SowFeedPrice,
        SweepParameter::GrowerFeedPrice,
        SweepParameter::Fcr,
        SweepParameter::LoanAmount,
        SweepParameter::InterestRate,
        SweepParameter::Months,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SweepParameter::TotalSows => "total-sows",
            SweepParameter::PigletsPerCycle => "piglets-per-cycle",
            SweepParameter::PigletMortality => "piglet-mortality",
            SweepParameter::AbortionRate => "abortion-rate",
            SweepParameter::SalePrice => "sale-price",
            SweepParameter::SowFeedPrice => "sow-feed-price",
            SweepParameter::GrowerFeedPrice => "grower-feed-price",
            SweepParameter::Fcr => "fcr",
            SweepParameter::LoanAmount => "loan-amount",
            SweepParameter::InterestRate => "interest-rate",
            SweepParameter::Months => "months",
        }
    }

    /// Set this field of `config` to `value`.
    ///
    /// Count fields are rounded. A count that is not finite, is negative or
    /// does not fit is rejected rather than clamped.
    pub fn apply(&self, config: &mut SimulationConfig, value: f64) -> Result<(), ConfigError> {
        match self {
            SweepParameter::TotalSows => config.total_sows = count(self.name(), value)?,
            SweepParameter::PigletsPerCycle => config.piglets_per_cycle = value,
            SweepParameter::PigletMortality => config.piglet_mortality = value,
            SweepParameter::AbortionRate => config.abortion_rate = value,
            SweepParameter::SalePrice => config.sale_price = value,
            SweepParameter::SowFeedPrice => config.sow_feed_price = value,
            SweepParameter::GrowerFeedPrice => config.grower_feed_price = value,
            SweepParameter::Fcr => config.fcr = value,
            SweepParameter::LoanAmount => config.loan_amount = value,
            SweepParameter::InterestRate => config.interest_rate = value,
            SweepParameter::Months => config.months = count(self.name(), value)?,
        }
        Ok(())
    }
}

fn count(field: &'static str, value: f64) -> Result<u32, ConfigError> {
    let rounded = value.round();
    if rounded.is_finite() && (0.0..=u32::MAX as f64).contains(&rounded) {
        Ok(rounded as u32)
    } else {
        Err(ConfigError::InvalidCount { field, value })
    }
}

impl fmt::Display for SweepParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SweepParameter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('_', "-").to_lowercase();
        SweepParameter::ALL
            .iter()
            .copied()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<_> = SweepParameter::ALL.iter().map(|p| p.name()).collect();
                format!("unknown sweep parameter '{}', expected one of: {}", s, names.join(", "))
            })
    }
}

/// Outcome of one sweep value
#[derive(Debug)]
pub struct SweepPoint {
    pub value: f64,
    pub result: Result<SimulationResult, ConfigError>,
}

/// Re-runs the simulator over variations of a base configuration
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    base_config: SimulationConfig,
}

impl ScenarioRunner {
    pub fn new(base_config: SimulationConfig) -> Self {
        Self { base_config }
    }

    /// Simulate the base configuration
    pub fn run(&self) -> Result<SimulationResult, ConfigError> {
        simulate(&self.base_config)
    }

    /// Simulate a modified copy of the base configuration
    pub fn run_with<F>(&self, modify: F) -> Result<SimulationResult, ConfigError>
    where
        F: FnOnce(&mut SimulationConfig),
    {
        let mut config = self.base_config.clone();
        modify(&mut config);
        simulate(&config)
    }

    /// One simulation per value, in parallel. Output order matches `values`.
    pub fn sweep(&self, parameter: SweepParameter, values: &[f64]) -> Vec<SweepPoint> {
        values
            .par_iter()
            .map(|&value| {
                let mut config = self.base_config.clone();
                let result = parameter.apply(&mut config, value).and_then(|()| simulate(&config));
                SweepPoint { value, result }
            })
            .collect()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.base_config
    }
}
