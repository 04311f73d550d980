use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// Number of decimals every amount is printed with.
pub const DISPLAY_DIGITS: u32 = 2;

/// Date layout of the first field of every ledger line.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single ledger line once parsed. Nothing mutates it after `read_costs`
/// hands it out; the aggregation only borrows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cost {
    pub date: NaiveDate,
    pub source: String,
    pub amount: Decimal,
    pub note: String,
}

impl Cost {
    pub fn month(&self) -> MonthKey {
        MonthKey::from(self.date)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {}",
            self.date.format(DATE_FORMAT),
            self.source,
            Amount(self.amount)
        )
    }
}

/// The four raw fields of a ledger line, before any conversion. Fields are
/// positional, the file has no header.
#[derive(Debug, Deserialize)]
pub(crate) struct RawCost {
    pub date: String,
    pub source: String,
    pub amount: String,
    pub note: String,
}

/// Calendar month a cost falls in. The derived ordering compares the year
/// first, so sorting keys is chronological whatever the textual form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl From<NaiveDate> for MonthKey {
    fn from(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Accumulated amount for one source, either over the whole ledger or within
/// a single month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTotal {
    pub name: String,
    pub amount: Decimal,
}

impl fmt::Display for SourceTotal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, Amount(self.amount))
    }
}

/// Display wrapper printing an amount with exactly `DISPLAY_DIGITS` decimals,
/// rounding halves away from zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amount(pub Decimal);

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(DISPLAY_DIGITS, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "{:.*}", DISPLAY_DIGITS as usize, rounded)
    }
}

/// Ledger errors. Any of them aborts the run; `line` is 1-based.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("Line {line} missing expected number of fields ({found} instead of 4): {content}")]
    FieldCount {
        line: u64,
        found: usize,
        content: String,
    },
    #[error("Line {line}: unable to parse date: {value}")]
    Date { line: u64, value: String },
    #[error("Line {line}: unable to parse amount: {value}")]
    Amount { line: u64, value: String },
    #[error("Totals overflowed adding {amount} for {name}")]
    Overflow { name: String, amount: Decimal },
}
