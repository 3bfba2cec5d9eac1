//! Loan amortization with an optional moratorium

use log::debug;

use crate::config::{MoratoriumPolicy, SimulationConfig};

/// Fixed annuity payment that amortizes `principal` over `months` periods
/// at `monthly_rate`.
pub fn annuity_payment(principal: f64, monthly_rate: f64, months: u32) -> f64 {
    if principal <= 0.0 || months == 0 {
        return 0.0;
    }
    if monthly_rate == 0.0 {
        return principal / months as f64;
    }
    let growth = (1.0 + monthly_rate).powi(months as i32);
    principal * monthly_rate * growth / (growth - 1.0)
}

/// Where the loan is in its life in a given month
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanPhase {
    Moratorium,
    Repayment,
    Closed,
}

/// One month of loan service
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoanPayment {
    /// Cash paid this month
    pub payment: f64,
    /// Interest part of `payment`
    pub interest: f64,
    /// Principal part of `payment`
    pub principal: f64,
    /// Interest added to the balance instead of paid
    pub capitalized: f64,
}

/// Running state of the single farm loan.
///
/// The EMI is not the plain annuity on the amount borrowed over the full
/// tenure. It is fixed in the first repayment month, from the balance at that
/// point, over the months left after the moratorium. With no moratorium the
/// two coincide; with one, the EMI is larger and the loan still closes at
/// zero balance at tenure end.
#[derive(Debug, Clone)]
pub struct LoanState {
    pub principal: f64,
    pub balance: f64,
    pub monthly_rate: f64,
    pub tenure_months: u32,
    pub moratorium_months: u32,
    pub moratorium_policy: MoratoriumPolicy,
    /// Fixed once repayment starts
    pub emi: Option<f64>,
    pub total_interest_paid: f64,
    pub total_principal_repaid: f64,
    pub total_interest_capitalized: f64,
    /// Phase seen by the last call to `service`
    last_phase: Option<LoanPhase>,
}

impl LoanState {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            principal: config.loan_amount,
            balance: config.loan_amount,
            monthly_rate: config.monthly_interest_rate(),
            tenure_months: config.loan_tenure_months(),
            moratorium_months: config.moratorium_months,
            moratorium_policy: config.moratorium_policy,
            emi: None,
            total_interest_paid: 0.0,
            total_principal_repaid: 0.0,
            total_interest_capitalized: 0.0,
            last_phase: None,
        }
    }

    pub fn phase(&self, month: u32) -> LoanPhase {
        if self.principal <= 0.0 {
            LoanPhase::Closed
        } else if month <= self.moratorium_months {
            LoanPhase::Moratorium
        } else if month <= self.tenure_months {
            LoanPhase::Repayment
        } else {
            LoanPhase::Closed
        }
    }

    /// Service the loan for `month` and update the balance
    pub fn service(&mut self, month: u32) -> LoanPayment {
        let phase = self.phase(month);
        if self.last_phase != Some(phase) {
            if self.last_phase.is_some() || phase != LoanPhase::Closed {
                debug!(
                    "month {}: loan enters {:?} phase, balance {:.2}",
                    month, phase, self.balance
                );
            }
            self.last_phase = Some(phase);
        }

        match phase {
            LoanPhase::Closed => LoanPayment::default(),
            LoanPhase::Moratorium => {
                let interest = self.balance * self.monthly_rate;
                match self.moratorium_policy {
                    MoratoriumPolicy::InterestPaid => {
                        self.total_interest_paid += interest;
                        LoanPayment { payment: interest, interest, ..Default::default() }
                    }
                    MoratoriumPolicy::InterestCapitalized => {
                        self.balance += interest;
                        self.total_interest_capitalized += interest;
                        LoanPayment { capitalized: interest, ..Default::default() }
                    }
                }
            }
            LoanPhase::Repayment => {
                let emi = match self.emi {
                    Some(emi) => emi,
                    None => {
                        let repayment_months = self.tenure_months - self.moratorium_months;
                        let emi = annuity_payment(self.balance, self.monthly_rate, repayment_months);
                        debug!(
                            "month {}: loan repayment starts, balance {:.2}, EMI {:.2} over {} months",
                            month, self.balance, emi, repayment_months
                        );
                        self.emi = Some(emi);
                        emi
                    }
                };

                let interest = self.balance * self.monthly_rate;
                let principal = emi - interest;
                self.balance -= principal;
                self.total_interest_paid += interest;
                self.total_principal_repaid += principal;

                LoanPayment { payment: emi, interest, principal, capitalized: 0.0 }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn loan_config(amount: f64, rate: f64, years: u32, moratorium: u32) -> SimulationConfig {
        SimulationConfig {
            loan_amount: amount,
            interest_rate: rate,
            loan_tenure_years: years,
            moratorium_months: moratorium,
            ..Default::default()
        }
    }

    #[test]
    fn test_annuity_payment() {
        // 1,000,000 at 12% over 12 months
        let emi = annuity_payment(1_000_000.0, 0.01, 12);
        assert_relative_eq!(emi, 88_848.79, epsilon = 0.01);

        assert_relative_eq!(annuity_payment(1_200.0, 0.0, 12), 100.0);
        assert_eq!(annuity_payment(0.0, 0.01, 12), 0.0);
        assert_eq!(annuity_payment(1_000.0, 0.01, 0), 0.0);
    }

    #[test]
    fn test_full_amortization_without_moratorium() {
        let config = loan_config(4_000_000.0, 0.121, 5, 0);
        let mut loan = LoanState::from_config(&config);

        let mut principal_repaid = 0.0;
        for month in 1..=60 {
            assert_eq!(loan.phase(month), LoanPhase::Repayment);
            principal_repaid += loan.service(month).principal;
        }

        assert_relative_eq!(principal_repaid, 4_000_000.0, max_relative = 1e-9);
        assert_abs_diff_eq!(loan.balance, 0.0, epsilon = 1e-4);
        assert_eq!(loan.phase(61), LoanPhase::Closed);
        assert_eq!(loan.service(61), LoanPayment::default());

        let emi = loan.emi.expect("repayment started");
        assert_relative_eq!(loan.total_interest_paid, emi * 60.0 - 4_000_000.0, max_relative = 1e-9);
    }

    #[test]
    fn test_moratorium_interest_paid() {
        let config = loan_config(1_200_000.0, 0.12, 2, 6);
        let mut loan = LoanState::from_config(&config);

        for month in 1..=6 {
            let payment = loan.service(month);
            assert_relative_eq!(payment.payment, 12_000.0, max_relative = 1e-12);
            assert_eq!(payment.principal, 0.0);
        }
        assert_relative_eq!(loan.balance, 1_200_000.0);

        for month in 7..=24 {
            loan.service(month);
        }
        assert_abs_diff_eq!(loan.balance, 0.0, epsilon = 1e-4);
        assert_relative_eq!(
            loan.emi.unwrap(),
            annuity_payment(1_200_000.0, 0.01, 18),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_moratorium_interest_capitalized() {
        let config = SimulationConfig {
            moratorium_policy: MoratoriumPolicy::InterestCapitalized,
            ..loan_config(1_000_000.0, 0.12, 2, 3)
        };
        let mut loan = LoanState::from_config(&config);

        for month in 1..=3 {
            let payment = loan.service(month);
            assert_eq!(payment.payment, 0.0);
            assert!(payment.capitalized > 0.0);
        }
        assert_relative_eq!(loan.balance, 1_000_000.0 * 1.01_f64.powi(3), max_relative = 1e-12);
        assert_eq!(loan.total_interest_paid, 0.0);

        for month in 4..=24 {
            loan.service(month);
        }
        assert_abs_diff_eq!(loan.balance, 0.0, epsilon = 1e-4);
        assert_relative_eq!(
            loan.total_principal_repaid,
            1_000_000.0 + loan.total_interest_capitalized,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_phase_transitions_are_tracked() {
        let config = loan_config(1_200_000.0, 0.12, 1, 3);
        let mut loan = LoanState::from_config(&config);
        assert_eq!(loan.last_phase, None);

        let mut seen = Vec::new();
        for month in 1..=14 {
            loan.service(month);
            if seen.last() != loan.last_phase.as_ref() {
                seen.extend(loan.last_phase);
            }
        }
        assert_eq!(seen, [LoanPhase::Moratorium, LoanPhase::Repayment, LoanPhase::Closed]);
        assert_abs_diff_eq!(loan.balance, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_no_loan_is_closed() {
        let mut loan = LoanState::from_config(&SimulationConfig::default());
        assert_eq!(loan.phase(1), LoanPhase::Closed);
        assert_eq!(loan.service(1), LoanPayment::default());
    }
}
