//! Monthly and yearly output tables

use serde::{Deserialize, Serialize};

use super::state::Batch;
use super::summary::SimulationSummary;

/// One row of simulation output for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    // Timing
    pub month: u32,
    pub year: u32,

    // Herd
    pub sows_mated: f64,
    pub piglets_with_sow: f64,
    pub growers: f64,
    pub sold_pigs: f64,

    // Revenue and operating costs
    pub revenue: f64,
    pub sow_feed_cost: f64,
    pub grower_feed_cost: f64,
    pub staff_cost: f64,
    pub management_fee: f64,
    pub management_commission: f64,
    pub other_fixed_costs: f64,
    pub total_operating_cost: f64,

    // Non-cash, informational only
    pub depreciation: f64,

    // Financing
    pub loan_payment: f64,
    pub interest_paid: f64,
    pub principal_repaid: f64,
    pub loan_balance: f64,

    // Results
    pub monthly_profit: f64,
    pub monthly_cash_flow: f64,
    pub cumulative_cash_flow: f64,
}

impl MonthlyRecord {
    /// Create an empty row for `month` (1-indexed)
    pub fn new(month: u32) -> Self {
        Self {
            month,
            year: (month - 1) / 12 + 1,
            sows_mated: 0.0,
            piglets_with_sow: 0.0,
            growers: 0.0,
            sold_pigs: 0.0,
            revenue: 0.0,
            sow_feed_cost: 0.0,
            grower_feed_cost: 0.0,
            staff_cost: 0.0,
            management_fee: 0.0,
            management_commission: 0.0,
            other_fixed_costs: 0.0,
            total_operating_cost: 0.0,
            depreciation: 0.0,
            loan_payment: 0.0,
            interest_paid: 0.0,
            principal_repaid: 0.0,
            loan_balance: 0.0,
            monthly_profit: 0.0,
            monthly_cash_flow: 0.0,
            cumulative_cash_flow: 0.0,
        }
    }
}

/// Sums of monthly rows over one 12-month block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YearlyRecord {
    pub year: u32,
    /// Months in this block; the last block may be partial
    pub months: u32,
    pub sows_mated: f64,
    pub sold_pigs: f64,
    pub revenue: f64,
    pub sow_feed_cost: f64,
    pub grower_feed_cost: f64,
    pub staff_cost: f64,
    pub management_fee: f64,
    pub management_commission: f64,
    pub other_fixed_costs: f64,
    pub total_operating_cost: f64,
    pub depreciation: f64,
    pub loan_payment: f64,
    pub interest_paid: f64,
    pub monthly_profit: f64,
    pub monthly_cash_flow: f64,
    /// Revenue less operating cost
    pub cash_profit: f64,
    /// Cash profit less depreciation and loan payments
    pub profit_after_depreciation_and_loan: f64,
    /// Cumulative cash position at the end of the block
    pub closing_cumulative_cash_flow: f64,
}

impl YearlyRecord {
    fn add(&mut self, row: &MonthlyRecord) {
        self.months += 1;
        self.sows_mated += row.sows_mated;
        self.sold_pigs += row.sold_pigs;
        self.revenue += row.revenue;
        self.sow_feed_cost += row.sow_feed_cost;
        self.grower_feed_cost += row.grower_feed_cost;
        self.staff_cost += row.staff_cost;
        self.management_fee += row.management_fee;
        self.management_commission += row.management_commission;
        self.other_fixed_costs += row.other_fixed_costs;
        self.total_operating_cost += row.total_operating_cost;
        self.depreciation += row.depreciation;
        self.loan_payment += row.loan_payment;
        self.interest_paid += row.interest_paid;
        self.monthly_profit += row.monthly_profit;
        self.monthly_cash_flow += row.monthly_cash_flow;
        self.closing_cumulative_cash_flow = row.cumulative_cash_flow;
    }

    fn finish(&mut self) {
        self.cash_profit = self.revenue - self.total_operating_cost;
        self.profit_after_depreciation_and_loan =
            self.cash_profit - self.depreciation - self.loan_payment;
    }
}

/// Roll monthly rows up into consecutive 12-month blocks
pub fn yearly_rollup(records: &[MonthlyRecord]) -> Vec<YearlyRecord> {
    records
        .chunks(12)
        .enumerate()
        .map(|(i, block)| {
            let mut year = YearlyRecord { year: i as u32 + 1, ..Default::default() };
            for row in block {
                year.add(row);
            }
            year.finish();
            year
        })
        .collect()
}

/// Complete output of one simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    /// One row per simulated month
    pub records: Vec<MonthlyRecord>,

    pub summary: SimulationSummary,

    /// Every batch created during the run, in creation order
    pub batches: Vec<Batch>,
}

impl SimulationResult {
    pub fn yearly(&self) -> Vec<YearlyRecord> {
        yearly_rollup(&self.records)
    }

    pub fn record(&self, month: u32) -> Option<&MonthlyRecord> {
        month
            .checked_sub(1)
            .and_then(|index| self.records.get(index as usize))
    }
}
