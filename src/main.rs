use bills::{init_logging, run, ReadOptions, ReportOptions, Window};
use chrono_tz::Tz;
use clap::Parser;
use log::error;
use std::{path::PathBuf, process::ExitCode};

/// Report on the costs listed in a CSV ledger.
///
/// Ledger lines look like: YYYY-MM-DD,Store 123,10.00,Note about this
#[derive(Parser, Debug)]
#[command(name = "bills", version)]
struct Args {
    /// CSV file to read
    #[arg(long)]
    csv: PathBuf,

    /// Time zone location
    #[arg(long, default_value = "America/Vancouver", value_parser = parse_location)]
    location: Tz,

    /// Number of days back to include in the report. Entries older than this
    /// will be ignored
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..))]
    days_back: u32,
}

fn parse_location(s: &str) -> Result<Tz, String> {
    if s.is_empty() {
        return Err("You must specify a location".into());
    }
    s.parse::<Tz>()
        .map_err(|e| format!("Invalid location: {e}"))
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            e.print().ok();
            return ExitCode::FAILURE;
        }
        Err(e) => e.exit(),
    };
    init_logging();

    let window = Window {
        days_back: args.days_back,
    };
    let read_options = ReadOptions {
        cutoff: Some(window.cutoff_in(args.location)),
    };
    let report_options = ReportOptions { list_costs: true };
    match run(&args.csv, &read_options, &report_options, std::io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Unable to read costs: {e:#}");
            ExitCode::FAILURE
        }
    }
}
