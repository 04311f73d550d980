use bills::{init_logging, run, ReadOptions, ReportOptions};
use log::error;
use std::{path::Path, process::ExitCode};

/// Ledger read from the working directory.
const LEDGER: &str = "costs.csv";

fn main() -> ExitCode {
    init_logging();
    match run(
        Path::new(LEDGER),
        &ReadOptions::default(),
        &ReportOptions::default(),
        std::io::stdout().lock(),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Unable to read costs: {e:#}");
            ExitCode::FAILURE
        }
    }
}
