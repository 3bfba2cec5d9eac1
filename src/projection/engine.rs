//! Monthly herd and cash-flow simulation engine

use log::{debug, info, warn};

use super::loan::LoanState;
use super::records::{MonthlyRecord, SimulationResult};
use super::state::Herd;
use super::summary::SimulationSummary;
use crate::config::SimulationConfig;
use crate::error::ConfigError;

/// Validate `config` and run it to the end of its horizon.
///
/// Deterministic: the same configuration always yields the same result.
pub fn simulate(config: &SimulationConfig) -> Result<SimulationResult, ConfigError> {
    Ok(SimulationEngine::new(config.clone())?.run())
}

/// Mutable state carried from one month to the next
struct RunState {
    herd: Herd,
    loan: LoanState,
    working_capital: f64,
    first_sale_month: Option<u32>,
}

/// Main simulation engine
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    config: SimulationConfig,
}

impl SimulationEngine {
    /// Create an engine for a validated configuration
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Run the full horizon
    pub fn run(&self) -> SimulationResult {
        let mut state = RunState {
            herd: Herd::new(),
            loan: LoanState::from_config(&self.config),
            working_capital: 0.0,
            first_sale_month: None,
        };

        let mut records = Vec::with_capacity(self.config.months as usize);
        for month in 1..=self.config.months {
            records.push(self.calculate_month(month, &mut state));
        }

        // The opening position is only known once the first sale is found
        let initial_investment = self.config.total_capital() + state.working_capital;
        let mut position = -initial_investment;
        for row in &mut records {
            position += row.monthly_cash_flow;
            row.cumulative_cash_flow = position;
        }

        let summary = SimulationSummary::from_run(
            &self.config,
            &records,
            &state.herd,
            &state.loan,
            state.working_capital,
            state.first_sale_month,
        );
        self.log_outcome(&summary);

        SimulationResult {
            records,
            summary,
            batches: state.herd.into_batches(),
        }
    }

    /// Calculate one month of herd movements and cash flows
    fn calculate_month(&self, month: u32, state: &mut RunState) -> MonthlyRecord {
        let config = &self.config;
        let mut row = MonthlyRecord::new(month);

        // Fixed recurring costs
        row.sow_feed_cost = config.sow_feed_cost();
        row.staff_cost = config.staff_cost();
        row.management_fee = config.management_fee;

        // Mating: a steady share of the herd enters the cycle each month
        if month >= config.timings.mating_start_month {
            row.sows_mated = config.sows_mated_per_month();
            let pregnant = row.sows_mated * (1.0 - config.abortion_rate);
            if pregnant > 0.0 {
                let batch = state.herd.conceive(month, pregnant, config);
                debug!(
                    "month {}: batch {} conceived, {:.2} piglets, farrow {}, sale-ready {}",
                    month, batch.id, batch.piglets, batch.farrow_month, batch.grower_end_month
                );
            }
        }

        // Census
        row.piglets_with_sow = state.herd.piglets_with_sow(month);
        row.growers = state.herd.growers(month);
        row.grower_feed_cost = state.herd.grower_feed_kg(month) * config.grower_feed_price;

        // Sales
        state.herd.mark_ready(month);
        if config.sale_policy.is_sale_month(month) {
            row.sold_pigs = state.herd.sell_ready(month);
            if row.sold_pigs > 0.0 {
                debug!("month {}: sold {:.2} pigs", month, row.sold_pigs);
            }
        }
        row.revenue = row.sold_pigs * config.final_weight * config.sale_price;

        // Costs tied to revenue, and the rest
        row.management_commission = row.revenue * config.management_commission;
        row.other_fixed_costs = config.other_fixed_costs();
        row.total_operating_cost = row.sow_feed_cost
            + row.grower_feed_cost
            + row.staff_cost
            + row.management_fee
            + row.management_commission
            + row.other_fixed_costs;
        row.depreciation = config.monthly_depreciation();

        // Financing
        let payment = state.loan.service(month);
        row.loan_payment = payment.payment;
        row.interest_paid = payment.interest;
        row.principal_repaid = payment.principal;
        row.loan_balance = state.loan.balance;

        row.monthly_profit = row.revenue - row.total_operating_cost;
        row.monthly_cash_flow = row.monthly_profit - row.loan_payment;

        // Working capital runs up to and including the first sale month.
        // Commission is paid out of sale revenue, so it is left out.
        if state.first_sale_month.is_none() {
            state.working_capital += row.total_operating_cost - row.management_commission;
            if row.sold_pigs > 0.0 {
                state.first_sale_month = Some(month);
            }
        }

        row
    }

    fn log_outcome(&self, summary: &SimulationSummary) {
        match summary.break_even_month {
            Some(month) => info!(
                "{} months simulated, break-even in month {}, ROI {:.2}%",
                summary.months,
                month,
                summary.roi_pct.unwrap_or(0.0)
            ),
            None => info!(
                "{} months simulated, break-even not achieved, final position {:.2}",
                summary.months, summary.final_cumulative_cash_flow
            ),
        }
        if summary.first_sale_month.is_none() {
            warn!("no pigs were sold within the {}-month horizon", summary.months);
        }
        if summary.outstanding_loan_balance > 1e-6 {
            warn!(
                "loan balance of {:.2} still outstanding at the end of the horizon",
                summary.outstanding_loan_balance
            );
        }
    }
}
