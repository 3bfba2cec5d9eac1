//! Sow Rotation - month-by-month herd and cash-flow projection for a pig-breeding farm
//!
//! This library provides:
//! - A validated, serde-loadable simulation configuration
//! - Batch lifecycle tracking from mating through sale
//! - Operating cost, depreciation and loan amortization accrual
//! - Monthly and yearly output tables with a break-even / ROI / CAGR summary
//! - Parallel parameter sweeps and CSV export

pub mod config;
pub mod error;
pub mod projection;
pub mod report;
pub mod scenario;

// Re-export commonly used types
pub use config::{HusbandryTimings, MoratoriumPolicy, SalePolicy, SimulationConfig};
pub use error::{ConfigError, LoadError};
pub use projection::{simulate, MonthlyRecord, SimulationEngine, SimulationResult, SimulationSummary, YearlyRecord};
pub use scenario::{ScenarioRunner, SweepParameter};
