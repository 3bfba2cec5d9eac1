//! End-of-run summary: capital, herd totals, break-even and returns
//!
//! Ratios that are meaningless for a run (ROI on zero investment, CAGR on a
//! non-positive cash multiple) are `None`, never NaN or infinity.

use serde::{Deserialize, Serialize};

use super::loan::LoanState;
use super::records::MonthlyRecord;
use super::state::Herd;
use crate::config::SimulationConfig;

/// Summary statistics for a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub months: u32,

    // Capital
    pub shed_cost: f64,
    pub total_sow_capital: f64,
    pub total_capital_invested: f64,
    /// Operating costs, less commission, up to and including the first sale month
    pub working_capital: f64,
    /// Capital plus working capital
    pub initial_investment: f64,

    // Herd
    pub first_sale_month: Option<u32>,
    pub total_pigs_born: f64,
    pub total_pigs_sold: f64,
    pub total_pigs_remaining: f64,
    /// Sows plus unsold piglets at the end of the horizon
    pub animals_in_shed: f64,
    pub total_sows_mated: f64,

    // Loan
    pub total_interest_paid: f64,
    pub total_interest_capitalized: f64,
    pub outstanding_loan_balance: f64,

    // Returns
    pub break_even_month: Option<u32>,
    pub average_monthly_profit: f64,
    pub average_monthly_profit_after_break_even: Option<f64>,
    /// Sum of monthly cash flows
    pub total_cash_returned: f64,
    pub final_cumulative_cash_flow: f64,
    pub roi_pct: Option<f64>,
    pub cagr_pct: Option<f64>,
}

/// First month whose cumulative cash position is non-negative
pub fn break_even_month(records: &[MonthlyRecord]) -> Option<u32> {
    records
        .iter()
        .find(|r| r.cumulative_cash_flow >= 0.0)
        .map(|r| r.month)
}

/// Final cumulative cash position as a percentage of the initial investment
pub fn roi_pct(final_cumulative_cash_flow: f64, initial_investment: f64) -> Option<f64> {
    if initial_investment > 0.0 {
        Some(final_cumulative_cash_flow / initial_investment * 100.0)
    } else {
        None
    }
}

/// Compound annual growth of the cash multiple over `months`, in percent.
///
/// Cash multiple = cash returned / initial investment; only meaningful
/// when positive.
pub fn cagr_pct(cash_returned: f64, initial_investment: f64, months: u32) -> Option<f64> {
    if initial_investment <= 0.0 || months == 0 {
        return None;
    }
    let multiple = cash_returned / initial_investment;
    if multiple <= 0.0 {
        return None;
    }
    let years = months as f64 / 12.0;
    Some((multiple.powf(1.0 / years) - 1.0) * 100.0)
}

impl SimulationSummary {
    /// Build the summary from a finished run.
    ///
    /// `records` must already carry their cumulative cash position.
    pub fn from_run(
        config: &SimulationConfig,
        records: &[MonthlyRecord],
        herd: &Herd,
        loan: &LoanState,
        working_capital: f64,
        first_sale_month: Option<u32>,
    ) -> Self {
        let months = records.len() as u32;
        let total_capital_invested = config.total_capital();
        let initial_investment = total_capital_invested + working_capital;

        let total_profit: f64 = records.iter().map(|r| r.monthly_profit).sum();
        let total_cash_returned: f64 = records.iter().map(|r| r.monthly_cash_flow).sum();
        let final_cumulative_cash_flow = records
            .last()
            .map(|r| r.cumulative_cash_flow)
            .unwrap_or(-initial_investment);

        let break_even = break_even_month(records);
        let average_monthly_profit_after_break_even = break_even.map(|month| {
            let after: Vec<f64> = records
                .iter()
                .filter(|r| r.month >= month)
                .map(|r| r.monthly_profit)
                .collect();
            after.iter().sum::<f64>() / after.len() as f64
        });

        let total_pigs_remaining = herd.total_remaining();

        Self {
            months,
            shed_cost: config.shed_cost,
            total_sow_capital: config.total_sow_capital(),
            total_capital_invested,
            working_capital,
            initial_investment,
            first_sale_month,
            total_pigs_born: herd.total_born(),
            total_pigs_sold: herd.total_sold(),
            total_pigs_remaining,
            animals_in_shed: config.total_sows as f64 + total_pigs_remaining,
            total_sows_mated: records.iter().map(|r| r.sows_mated).sum(),
            total_interest_paid: loan.total_interest_paid,
            total_interest_capitalized: loan.total_interest_capitalized,
            outstanding_loan_balance: loan.balance.max(0.0),
            break_even_month: break_even,
            average_monthly_profit: if months > 0 { total_profit / months as f64 } else { 0.0 },
            average_monthly_profit_after_break_even,
            total_cash_returned,
            final_cumulative_cash_flow,
            roi_pct: roi_pct(final_cumulative_cash_flow, initial_investment),
            cagr_pct: cagr_pct(total_cash_returned, initial_investment, months),
        }
    }

    /// Ordered (label, value) pairs for display
    pub fn key_values(&self) -> Vec<(&'static str, String)> {
        let money = |v: f64| format!("{:.2}", v);
        let pigs = |v: f64| format!("{:.1}", v);
        let pct = |v: Option<f64>| match v {
            Some(v) => format!("{:.2}%", v),
            None => "not meaningful".to_string(),
        };
        let month = |m: Option<u32>| match m {
            Some(m) => m.to_string(),
            None => "not achieved".to_string(),
        };

        vec![
            ("Months Simulated", self.months.to_string()),
            ("Shed Cost", money(self.shed_cost)),
            ("Total Sow Capital", money(self.total_sow_capital)),
            ("Total Capital Invested", money(self.total_capital_invested)),
            ("Working Capital Until First Sale", money(self.working_capital)),
            ("Initial Investment", money(self.initial_investment)),
            ("First Sale Month", month(self.first_sale_month)),
            ("Total Pigs Born", pigs(self.total_pigs_born)),
            ("Total Pigs Sold", pigs(self.total_pigs_sold)),
            ("Pigs Remaining", pigs(self.total_pigs_remaining)),
            ("Animals In Shed", pigs(self.animals_in_shed)),
            ("Total Sows Mated", pigs(self.total_sows_mated)),
            ("Total Interest Paid", money(self.total_interest_paid)),
            ("Interest Capitalized", money(self.total_interest_capitalized)),
            ("Outstanding Loan Balance", money(self.outstanding_loan_balance)),
            ("Break-even Month", month(self.break_even_month)),
            ("Average Monthly Profit", money(self.average_monthly_profit)),
            (
                "Average Monthly Profit After Break-even",
                self.average_monthly_profit_after_break_even
                    .map(money)
                    .unwrap_or_else(|| "not achieved".to_string()),
            ),
            ("Total Cash Returned", money(self.total_cash_returned)),
            ("Final Cumulative Cash Flow", money(self.final_cumulative_cash_flow)),
            ("ROI", pct(self.roi_pct)),
            ("CAGR", pct(self.cagr_pct)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cumulative(values: &[f64]) -> Vec<MonthlyRecord> {
        values
            .iter()
            .enumerate()
            .map(|(i, &v)| MonthlyRecord {
                cumulative_cash_flow: v,
                ..MonthlyRecord::new(i as u32 + 1)
            })
            .collect()
    }

    #[test]
    fn test_break_even_is_first_crossing() {
        let records = cumulative(&[-300.0, -100.0, 0.0, -50.0, 20.0]);
        assert_eq!(break_even_month(&records), Some(3));

        let records = cumulative(&[-300.0, -200.0]);
        assert_eq!(break_even_month(&records), None);
    }

    #[test]
    fn test_roi() {
        assert_relative_eq!(roi_pct(500.0, 1_000.0).unwrap(), 50.0);
        assert_relative_eq!(roi_pct(-250.0, 1_000.0).unwrap(), -25.0);
        assert_eq!(roi_pct(500.0, 0.0), None);
    }

    #[test]
    fn test_cagr() {
        // Doubling over two years
        let cagr = cagr_pct(2_000.0, 1_000.0, 24).unwrap();
        assert_relative_eq!(cagr, (2.0_f64.sqrt() - 1.0) * 100.0, epsilon = 1e-9);

        // Getting the investment back exactly is zero growth
        assert_relative_eq!(cagr_pct(1_000.0, 1_000.0, 60).unwrap(), 0.0, epsilon = 1e-12);

        assert_eq!(cagr_pct(-10.0, 1_000.0, 60), None);
        assert_eq!(cagr_pct(0.0, 1_000.0, 60), None);
        assert_eq!(cagr_pct(100.0, 0.0, 60), None);
    }

    #[test]
    fn test_key_values_render_missing_metrics() {
        let config = SimulationConfig { months: 2, ..Default::default() };
        let records = cumulative(&[-10.0, -5.0]);
        let summary = SimulationSummary::from_run(
            &config,
            &records,
            &Herd::new(),
            &LoanState::from_config(&config),
            0.0,
            None,
        );

        let values = summary.key_values();
        let get = |label: &str| {
            values
                .iter()
                .find(|(l, _)| *l == label)
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(get("Break-even Month"), "not achieved");
        assert_eq!(get("First Sale Month"), "not achieved");
        assert_eq!(get("CAGR"), "not meaningful");
        assert_eq!(get("Months Simulated"), "2");
    }
}
