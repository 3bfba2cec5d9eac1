//! Sow Rotation CLI
//!
//! Command-line interface for running farm projections and parameter sweeps

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use serde::Serialize;

use sow_rotation::config::load_config;
use sow_rotation::report;
use sow_rotation::{
    simulate, MoratoriumPolicy, SalePolicy, ScenarioRunner, SimulationConfig, SimulationResult,
    SweepParameter, YearlyRecord,
};

#[derive(Parser)]
#[command(name = "sow-rotation", version, about = "Sow rotation farm cash-flow simulator")]
struct Cli {
    /// JSON file with any subset of configuration fields
    #[arg(long, short)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Simulate one configuration (default)
    Run(RunArgs),
    /// Re-run the simulation for several values of one parameter
    Sweep(SweepArgs),
    /// Print the default configuration as JSON
    Defaults,
}

#[derive(Args, Default)]
struct RunArgs {
    /// Monthly rows to print (default 24)
    #[arg(long)]
    rows: Option<usize>,

    /// Write the monthly table to this CSV file
    #[arg(long)]
    monthly_csv: Option<PathBuf>,

    /// Write the yearly roll-up to this CSV file
    #[arg(long)]
    yearly_csv: Option<PathBuf>,

    /// Print the full result as JSON instead of tables
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SweepArgs {
    /// Parameter to vary, e.g. total-sows, sale-price, loan-amount
    #[arg(long, short)]
    parameter: SweepParameter,

    /// Comma-separated values
    #[arg(long, short, value_delimiter = ',', required = true)]
    values: Vec<f64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum SalePolicyArg {
    /// Sell each batch as soon as it is ready
    Continuous,
    /// Sell every two months from month 13
    Bimonthly,
}

/// Per-field overrides applied on top of the config file
#[derive(Args)]
struct Overrides {
    #[arg(long)]
    total_sows: Option<u32>,
    #[arg(long)]
    piglets_per_cycle: Option<f64>,
    #[arg(long)]
    piglet_mortality: Option<f64>,
    #[arg(long)]
    abortion_rate: Option<f64>,
    #[arg(long)]
    sale_price: Option<f64>,
    #[arg(long)]
    sow_cost: Option<f64>,
    #[arg(long)]
    shed_cost: Option<f64>,
    #[arg(long)]
    loan_amount: Option<f64>,
    #[arg(long)]
    interest_rate: Option<f64>,
    #[arg(long)]
    loan_tenure_years: Option<u32>,
    #[arg(long)]
    moratorium_months: Option<u32>,
    /// Add moratorium interest to the loan balance instead of paying it
    #[arg(long)]
    capitalize_moratorium_interest: bool,
    #[arg(long)]
    months: Option<u32>,
    #[arg(long, value_enum)]
    sale_policy: Option<SalePolicyArg>,
}

impl Overrides {
    fn apply(&self, config: &mut SimulationConfig) {
        if let Some(v) = self.total_sows {
            config.total_sows = v;
        }
        if let Some(v) = self.piglets_per_cycle {
            config.piglets_per_cycle = v;
        }
        if let Some(v) = self.piglet_mortality {
            config.piglet_mortality = v;
        }
        if let Some(v) = self.abortion_rate {
            config.abortion_rate = v;
        }
        if let Some(v) = self.sale_price {
            config.sale_price = v;
        }
        if let Some(v) = self.sow_cost {
            config.sow_cost = v;
        }
        if let Some(v) = self.shed_cost {
            config.shed_cost = v;
        }
        if let Some(v) = self.loan_amount {
            config.loan_amount = v;
        }
        if let Some(v) = self.interest_rate {
            config.interest_rate = v;
        }
        if let Some(v) = self.loan_tenure_years {
            config.loan_tenure_years = v;
        }
        if let Some(v) = self.moratorium_months {
            config.moratorium_months = v;
        }
        if self.capitalize_moratorium_interest {
            config.moratorium_policy = MoratoriumPolicy::InterestCapitalized;
        }
        if let Some(v) = self.months {
            config.months = v;
        }
        if let Some(policy) = self.sale_policy {
            config.sale_policy = match policy {
                SalePolicyArg::Continuous => SalePolicy::Continuous,
                SalePolicyArg::Bimonthly => SalePolicy::bimonthly(),
            };
        }
    }
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    config: &'a SimulationConfig,
    result: &'a SimulationResult,
    yearly: &'a [YearlyRecord],
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    cli.overrides.apply(&mut config);

    match cli.command.unwrap_or(Command::Run(RunArgs::default())) {
        Command::Run(args) => run(&config, &args),
        Command::Sweep(args) => sweep(config, &args),
        Command::Defaults => {
            let json = serde_json::to_string_pretty(&SimulationConfig::default())?;
            println!("{}", json);
            Ok(())
        }
    }
}

fn run(config: &SimulationConfig, args: &RunArgs) -> Result<()> {
    let result = simulate(config).context("invalid configuration")?;
    let yearly = result.yearly();

    if let Some(path) = &args.monthly_csv {
        report::write_monthly_csv_file(path, &result.records)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("monthly table written to {}", path.display());
    }
    if let Some(path) = &args.yearly_csv {
        report::write_yearly_csv_file(path, &yearly)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("yearly table written to {}", path.display());
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.json {
        let output = JsonOutput { config, result: &result, yearly: &yearly };
        serde_json::to_writer_pretty(&mut out, &output)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "Sow Rotation Simulator v{}", env!("CARGO_PKG_VERSION"))?;
    writeln!(out, "==========================\n")?;
    writeln!(
        out,
        "Herd: {} sows, {} piglets/cycle, sale at {} kg for {:.2}/kg, {} months\n",
        config.total_sows, config.piglets_per_cycle, config.final_weight, config.sale_price, config.months
    )?;

    writeln!(out, "Monthly projection:")?;
    report::print_monthly_table(&mut out, &result.records, args.rows.unwrap_or(24))?;

    writeln!(out, "\nYearly roll-up:")?;
    writeln!(
        out,
        "{:>4} {:>10} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "Year", "Sold", "Revenue", "OpCost", "CashProfit", "AfterDepLoan", "Closing"
    )?;
    for year in &yearly {
        writeln!(
            out,
            "{:>4} {:>10.1} {:>14.0} {:>14.0} {:>14.0} {:>14.0} {:>14.0}",
            year.year,
            year.sold_pigs,
            year.revenue,
            year.total_operating_cost,
            year.cash_profit,
            year.profit_after_depreciation_and_loan,
            year.closing_cumulative_cash_flow,
        )?;
    }

    writeln!(out, "\nSummary:")?;
    report::print_summary(&mut out, &result.summary)?;
    Ok(())
}

fn sweep(config: SimulationConfig, args: &SweepArgs) -> Result<()> {
    let runner = ScenarioRunner::new(config);
    let points = runner.sweep(args.parameter, &args.values);

    println!(
        "{:>16} {:>10} {:>12} {:>12} {:>16}",
        args.parameter.name(),
        "BreakEven",
        "ROI %",
        "CAGR %",
        "FinalPosition"
    );
    println!("{}", "-".repeat(70));

    let fmt_opt = |v: Option<f64>| v.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "n/a".to_string());

    for point in &points {
        match &point.result {
            Ok(result) => {
                let summary = &result.summary;
                println!(
                    "{:>16} {:>10} {:>12} {:>12} {:>16.0}",
                    point.value,
                    summary
                        .break_even_month
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "never".to_string()),
                    fmt_opt(summary.roi_pct),
                    fmt_opt(summary.cagr_pct),
                    summary.final_cumulative_cash_flow,
                );
            }
            Err(err) => println!("{:>16} invalid: {}", point.value, err),
        }
    }
    Ok(())
}
