//! Simulation inputs: business parameters, husbandry timings and policies

pub mod loader;

pub use loader::{load_config, load_config_from_reader};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Longest horizon a run may cover (100 years)
pub const MAX_MONTHS: u32 = 1200;

/// Longest loan tenure accepted
pub const MAX_LOAN_TENURE_YEARS: u32 = 100;

/// When ready batches are taken to market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SalePolicy {
    /// Sell every ready, unsold batch in the month it becomes ready
    #[default]
    Continuous,
    /// Sell every ready, unsold batch on fixed sale months only:
    /// `first_month`, `first_month + interval_months`, ...
    Periodic { first_month: u32, interval_months: u32 },
}

impl SalePolicy {
    /// Sale window used by the bimonthly variant of the farm model
    pub fn bimonthly() -> Self {
        SalePolicy::Periodic { first_month: 13, interval_months: 2 }
    }

    /// Whether a sale may happen in `month`
    pub fn is_sale_month(&self, month: u32) -> bool {
        match *self {
            SalePolicy::Continuous => true,
            SalePolicy::Periodic { first_month, interval_months } => {
                month >= first_month && (month - first_month) % interval_months == 0
            }
        }
    }
}

/// Treatment of interest that accrues during the loan moratorium
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoratoriumPolicy {
    /// Interest on the balance is paid in cash every moratorium month
    #[default]
    InterestPaid,
    /// Interest is added to the balance; nothing is paid
    InterestCapitalized,
}

/// Breeding and growth durations, in months
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HusbandryTimings {
    /// Months from mating to farrowing
    pub gestation_months: u32,
    /// Months from farrowing to weaning
    pub lactation_months: u32,
    /// Months from weaning to market weight
    pub grower_months: u32,
    /// First month in which sows are mated
    pub mating_start_month: u32,
    /// Gestation share of the sow breeding cycle
    pub cycle_gestation: f64,
    /// Lactation share of the sow breeding cycle
    pub cycle_lactation: f64,
    /// Wean-to-service interval
    pub cycle_rebreeding: f64,
    /// Feeding days per month, used for sow feed
    pub days_per_month: f64,
}

impl Default for HusbandryTimings {
    fn default() -> Self {
        Self {
            gestation_months: 4,
            lactation_months: 1,
            grower_months: 6,
            mating_start_month: 2,
            cycle_gestation: 3.8,
            cycle_lactation: 1.3,
            cycle_rebreeding: 0.33,
            days_per_month: 30.0,
        }
    }
}

impl HusbandryTimings {
    /// Average length of one sow breeding cycle in months (~5.43 by default)
    pub fn average_cycle_length(&self) -> f64 {
        self.cycle_gestation + self.cycle_lactation + self.cycle_rebreeding
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.gestation_months == 0 {
            return Err(ConfigError::InvalidTiming {
                field: "gestation_months",
                reason: "farrowing must come after mating",
            });
        }
        if self.lactation_months == 0 {
            return Err(ConfigError::InvalidTiming {
                field: "lactation_months",
                reason: "weaning must come after farrowing",
            });
        }
        if self.grower_months == 0 {
            return Err(ConfigError::InvalidTiming {
                field: "grower_months",
                reason: "grower window must last at least one month",
            });
        }
        let life = self
            .gestation_months
            .checked_add(self.lactation_months)
            .and_then(|m| m.checked_add(self.grower_months));
        if !matches!(life, Some(m) if m <= MAX_MONTHS) {
            return Err(ConfigError::InvalidTiming {
                field: "grower_months",
                reason: "gestation, lactation and grower months together exceed the longest horizon",
            });
        }
        if self.mating_start_month == 0 {
            return Err(ConfigError::InvalidTiming {
                field: "mating_start_month",
                reason: "months are numbered from 1",
            });
        }
        non_negative("cycle_gestation", self.cycle_gestation)?;
        non_negative("cycle_lactation", self.cycle_lactation)?;
        non_negative("cycle_rebreeding", self.cycle_rebreeding)?;
        positive("average_cycle_length", self.average_cycle_length())?;
        positive("days_per_month", self.days_per_month)?;
        Ok(())
    }
}

/// Every business parameter of one simulation run.
///
/// Monetary amounts are in a single currency unit; prices are per kg.
/// Rates are fractions in [0, 1]. Any subset of fields may be given in a
/// config file; the rest take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // Herd and reproduction
    pub total_sows: u32,
    pub piglets_per_cycle: f64,
    pub piglet_mortality: f64,
    pub abortion_rate: f64,

    // Feed and sale
    pub sow_feed_price: f64,
    /// kg per sow per day
    pub sow_feed_intake: f64,
    pub grower_feed_price: f64,
    /// Feed conversion ratio (kg feed per kg gain)
    pub fcr: f64,
    /// Target sale weight in kg
    pub final_weight: f64,
    pub sale_price: f64,

    // Management and staff
    pub management_fee: f64,
    /// Share of revenue paid to management
    pub management_commission: f64,
    pub supervisor_salary: f64,
    pub worker_salary: f64,
    pub n_workers: u32,

    // Capital
    pub shed_cost: f64,
    pub shed_life_years: u32,
    /// Purchase price per sow
    pub sow_cost: f64,
    pub sow_life_years: u32,

    // Loan
    pub loan_amount: f64,
    /// Annual interest rate
    pub interest_rate: f64,
    pub loan_tenure_years: u32,
    pub moratorium_months: u32,
    pub moratorium_policy: MoratoriumPolicy,

    // Recurring fixed costs, per month
    pub medicine_cost: f64,
    pub electricity_cost: f64,
    pub land_lease: f64,

    /// Simulation horizon
    pub months: u32,
    pub sale_policy: SalePolicy,
    pub timings: HusbandryTimings,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            total_sows: 30,
            piglets_per_cycle: 8.0,
            piglet_mortality: 0.03,
            abortion_rate: 0.03,
            sow_feed_price: 32.0,
            sow_feed_intake: 2.8,
            grower_feed_price: 28.0,
            fcr: 3.2,
            final_weight: 105.0,
            sale_price: 180.0,
            management_fee: 50_000.0,
            management_commission: 0.05,
            supervisor_salary: 25_000.0,
            worker_salary: 18_000.0,
            n_workers: 2,
            shed_cost: 1_000_000.0,
            shed_life_years: 10,
            sow_cost: 35_000.0,
            sow_life_years: 4,
            loan_amount: 0.0,
            interest_rate: 0.10,
            loan_tenure_years: 5,
            moratorium_months: 0,
            moratorium_policy: MoratoriumPolicy::default(),
            medicine_cost: 10_000.0,
            electricity_cost: 5_000.0,
            land_lease: 10_000.0,
            months: 60,
            sale_policy: SalePolicy::default(),
            timings: HusbandryTimings::default(),
        }
    }
}

impl SimulationConfig {
    /// Check every constraint, returning the first violation.
    ///
    /// Guarantees that nothing in the monthly loop divides by zero or
    /// produces a negative head count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.months == 0 || self.months > MAX_MONTHS {
            return Err(ConfigError::InvalidHorizon(self.months));
        }

        rate("piglet_mortality", self.piglet_mortality)?;
        rate("abortion_rate", self.abortion_rate)?;
        rate("management_commission", self.management_commission)?;
        rate("interest_rate", self.interest_rate)?;

        for (field, value) in [
            ("piglets_per_cycle", self.piglets_per_cycle),
            ("sow_feed_price", self.sow_feed_price),
            ("sow_feed_intake", self.sow_feed_intake),
            ("grower_feed_price", self.grower_feed_price),
            ("fcr", self.fcr),
            ("final_weight", self.final_weight),
            ("sale_price", self.sale_price),
            ("management_fee", self.management_fee),
            ("supervisor_salary", self.supervisor_salary),
            ("worker_salary", self.worker_salary),
            ("shed_cost", self.shed_cost),
            ("sow_cost", self.sow_cost),
            ("loan_amount", self.loan_amount),
            ("medicine_cost", self.medicine_cost),
            ("electricity_cost", self.electricity_cost),
            ("land_lease", self.land_lease),
        ] {
            non_negative(field, value)?;
        }

        positive("shed_life_years", self.shed_life_years as f64)?;
        positive("sow_life_years", self.sow_life_years as f64)?;

        if self.loan_amount > 0.0 {
            positive("loan_tenure_years", self.loan_tenure_years as f64)?;
            if self.loan_tenure_years > MAX_LOAN_TENURE_YEARS {
                return Err(ConfigError::InvalidTiming {
                    field: "loan_tenure_years",
                    reason: "loan tenure may not exceed 100 years",
                });
            }
            if self.moratorium_months >= self.loan_tenure_months() {
                return Err(ConfigError::MoratoriumExceedsTenure {
                    moratorium_months: self.moratorium_months,
                    tenure_months: self.loan_tenure_months(),
                });
            }
        }

        if let SalePolicy::Periodic { first_month, interval_months } = self.sale_policy {
            if first_month == 0 {
                return Err(ConfigError::InvalidTiming {
                    field: "sale_policy.first_month",
                    reason: "months are numbered from 1",
                });
            }
            if interval_months == 0 {
                return Err(ConfigError::InvalidTiming {
                    field: "sale_policy.interval_months",
                    reason: "sale interval must be at least one month",
                });
            }
        }

        self.timings.validate()
    }

    /// Purchase cost of the whole sow herd
    pub fn total_sow_capital(&self) -> f64 {
        self.sow_cost * self.total_sows as f64
    }

    /// Shed plus sow herd
    pub fn total_capital(&self) -> f64 {
        self.shed_cost + self.total_sow_capital()
    }

    pub fn staff_cost(&self) -> f64 {
        self.supervisor_salary + self.n_workers as f64 * self.worker_salary
    }

    /// Medicine, electricity and land lease
    pub fn other_fixed_costs(&self) -> f64 {
        self.medicine_cost + self.electricity_cost + self.land_lease
    }

    /// Monthly feed bill for the breeding herd
    pub fn sow_feed_cost(&self) -> f64 {
        self.total_sows as f64 * self.sow_feed_intake * self.timings.days_per_month * self.sow_feed_price
    }

    /// Straight-line depreciation of shed and sows (non-cash)
    pub fn monthly_depreciation(&self) -> f64 {
        self.shed_cost / (self.shed_life_years as f64 * 12.0)
            + self.total_sow_capital() / (self.sow_life_years as f64 * 12.0)
    }

    /// Expected sows entering a mating cycle each month
    pub fn sows_mated_per_month(&self) -> f64 {
        self.total_sows as f64 / self.timings.average_cycle_length()
    }

    /// Saturates instead of overflowing; validation caps the tenure
    pub fn loan_tenure_months(&self) -> u32 {
        self.loan_tenure_years.saturating_mul(12)
    }

    pub fn monthly_interest_rate(&self) -> f64 {
        self.interest_rate / 12.0
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn rate(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::RateOutOfRange { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < 0.0 {
        Err(ConfigError::NegativeAmount { field, value })
    } else {
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}
