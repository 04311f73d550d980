use crate::{
    compute::{sorted_by_date, Totals},
    data::{Amount, Cost},
};
use std::io::Write;

const DIVIDER: &str = "----";
const INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, Default)]
pub struct ReportOptions {
    /// Print every cost, oldest first, before the totals.
    pub list_costs: bool,
}

/// Plain text report, written in one go once all costs are in.
pub fn write_report<W: Write>(
    mut writer: W,
    costs: &[Cost],
    totals: &Totals,
    options: &ReportOptions,
) -> Result<(), anyhow::Error> {
    if options.list_costs {
        writeln!(writer, "Costs:")?;
        for cost in sorted_by_date(costs) {
            writeln!(writer, "{cost}")?;
        }
        writeln!(writer)?;
    }
    writeln!(writer, "Total: {}", Amount(totals.total))?;
    divider(&mut writer)?;

    writeln!(writer, "Grouped costs:")?;
    for source in totals.sources() {
        writeln!(writer, "{source}")?;
    }
    divider(&mut writer)?;

    writeln!(writer, "Monthly costs:")?;
    for (month, amount) in totals.months() {
        writeln!(writer, "{month}: {}", Amount(amount))?;
    }
    divider(&mut writer)?;

    writeln!(writer, "Monthly costs by source:")?;
    for (month, sources) in totals.month_sources() {
        writeln!(writer, "{month}:")?;
        for source in sources {
            writeln!(writer, "{INDENT}{source}")?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn divider<W: Write>(writer: &mut W) -> std::io::Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{DIVIDER}")?;
    writeln!(writer)
}
