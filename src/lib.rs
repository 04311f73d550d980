//! Expense ledger report: reads `date,source,amount,note` lines and prints
//! totals per source, per month and per source within each month.

use std::io::Write;

pub mod compute;
pub mod data;
pub mod read;
pub mod write;

pub use compute::Totals;
pub use data::{Cost, Error, MonthKey, SourceTotal};
pub use read::{read_costs, read_costs_file, ReadOptions, Window};
pub use write::{write_report, ReportOptions};

/// Installs the logger shared by both binaries: bare messages on stderr, no
/// level or timestamp, `info` and above. The environment is not consulted.
pub fn init_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .target(env_logger::Target::Stderr)
        .init();
}

/// Reads, tallies and prints in one go. Nothing reaches `out` unless the whole
/// ledger parsed.
pub fn run<W: Write>(
    path: &std::path::Path,
    read_options: &ReadOptions,
    report_options: &ReportOptions,
    out: W,
) -> Result<(), anyhow::Error> {
    let costs = read_costs_file(path, read_options)?;
    let totals = Totals::tally(&costs)?;
    write_report(out, &costs, &totals, report_options)
}
