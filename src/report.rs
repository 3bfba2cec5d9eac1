//! CSV export of simulation tables and plain-text summary rendering

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::projection::{MonthlyRecord, SimulationSummary, YearlyRecord};

/// Write monthly rows as CSV, one header row plus one row per month
pub fn write_monthly_csv<W: Write>(writer: W, records: &[MonthlyRecord]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the yearly roll-up as CSV
pub fn write_yearly_csv<W: Write>(writer: W, years: &[YearlyRecord]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for year in years {
        wtr.serialize(year)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the summary as two-column `metric,value` CSV
pub fn write_summary_csv<W: Write>(writer: W, summary: &SimulationSummary) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["metric", "value"])?;
    for (label, value) in summary.key_values() {
        wtr.write_record([label, value.as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_monthly_csv_file<P: AsRef<Path>>(path: P, records: &[MonthlyRecord]) -> csv::Result<()> {
    write_monthly_csv(File::create(path)?, records)
}

pub fn write_yearly_csv_file<P: AsRef<Path>>(path: P, years: &[YearlyRecord]) -> csv::Result<()> {
    write_yearly_csv(File::create(path)?, years)
}

/// Print the summary as aligned `label: value` lines
pub fn print_summary<W: Write>(out: &mut W, summary: &SimulationSummary) -> io::Result<()> {
    let pairs = summary.key_values();
    let width = pairs.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in pairs {
        writeln!(out, "  {:<width$}  {}", format!("{}:", label), value, width = width + 1)?;
    }
    Ok(())
}

/// Print the first `limit` monthly rows as a fixed-width table
pub fn print_monthly_table<W: Write>(
    out: &mut W,
    records: &[MonthlyRecord],
    limit: usize,
) -> io::Result<()> {
    writeln!(
        out,
        "{:>5} {:>8} {:>9} {:>9} {:>8} {:>13} {:>13} {:>12} {:>13} {:>15}",
        "Month", "Mated", "WithSow", "Growers", "Sold", "Revenue", "OpCost", "Loan", "CashFlow", "Cumulative"
    )?;
    writeln!(out, "{}", "-".repeat(112))?;

    for row in records.iter().take(limit) {
        writeln!(
            out,
            "{:>5} {:>8.2} {:>9.2} {:>9.2} {:>8.2} {:>13.0} {:>13.0} {:>12.0} {:>13.0} {:>15.0}",
            row.month,
            row.sows_mated,
            row.piglets_with_sow,
            row.growers,
            row.sold_pigs,
            row.revenue,
            row.total_operating_cost,
            row.loan_payment,
            row.monthly_cash_flow,
            row.cumulative_cash_flow,
        )?;
    }

    if records.len() > limit {
        writeln!(out, "... ({} more months)", records.len() - limit)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::projection::simulate;

    fn short_run() -> crate::projection::SimulationResult {
        simulate(&SimulationConfig { months: 18, ..Default::default() }).unwrap()
    }

    #[test]
    fn test_monthly_csv_has_header_and_rows() {
        let result = short_run();
        let mut buf = Vec::new();
        write_monthly_csv(&mut buf, &result.records).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 19);
        assert!(lines[0].starts_with("month,year,sows_mated,"));
        assert!(lines[0].ends_with("cumulative_cash_flow"));
        assert!(lines[1].starts_with("1,1,"));
    }

    #[test]
    fn test_monthly_csv_reads_back() {
        let result = short_run();
        let mut buf = Vec::new();
        write_monthly_csv(&mut buf, &result.records).unwrap();

        let mut reader = csv::Reader::from_reader(buf.as_slice());
        let rows: Vec<MonthlyRecord> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(rows.len(), result.records.len());
        assert_eq!(rows[12].month, 13);
        assert!(rows[12].sold_pigs > 0.0);
    }

    #[test]
    fn test_yearly_csv() {
        let result = short_run();
        let mut buf = Vec::new();
        write_yearly_csv(&mut buf, &result.yearly()).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().next().unwrap().contains("profit_after_depreciation_and_loan"));
    }

    #[test]
    fn test_summary_outputs() {
        let result = short_run();

        let mut buf = Vec::new();
        write_summary_csv(&mut buf, &result.summary).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().next(), Some("metric,value"));
        assert!(text.contains("First Sale Month,13"));

        let mut out = Vec::new();
        print_summary(&mut out, &result.summary).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Break-even Month:"));
    }

    #[test]
    fn test_table_truncates() {
        let result = short_run();
        let mut out = Vec::new();
        print_monthly_table(&mut out, &result.records, 12).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2 + 12 + 1);
        assert!(text.ends_with("... (6 more months)\n"));
    }
}
