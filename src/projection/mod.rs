//! Herd and finance simulator: monthly projection of batches, costs, loan and cash

mod state;
mod loan;
mod records;
mod summary;
mod engine;

pub use state::{Batch, BatchStatus, Herd};
pub use loan::{annuity_payment, LoanPayment, LoanPhase, LoanState};
pub use records::{yearly_rollup, MonthlyRecord, SimulationResult, YearlyRecord};
pub use summary::{break_even_month, cagr_pct, roi_pct, SimulationSummary};
pub use engine::{simulate, SimulationEngine};
