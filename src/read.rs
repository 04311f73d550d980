use crate::data::{Cost, Error, RawCost, DATE_FORMAT};
use anyhow::Context;
use chrono::{Days, NaiveDate, Utc};
use chrono_tz::Tz;
use csv::StringRecord;
use log::{debug, info};
use rust_decimal::Decimal;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
};

const FIELDS: usize = 4;

/// Recency window: only costs dated within the last `days_back` days are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub days_back: u32,
}

impl Window {
    /// Oldest date still kept, relative to `today`.
    pub fn cutoff(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(u64::from(self.days_back)))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Same as `cutoff`, with today taken from the wall clock in `location`.
    pub fn cutoff_in(&self, location: Tz) -> NaiveDate {
        self.cutoff(Utc::now().with_timezone(&location).date_naive())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOptions {
    /// Costs dated strictly before this are dropped. `None` keeps everything.
    pub cutoff: Option<NaiveDate>,
}

/// Opens `path` and reads every cost in it. The file is closed on return,
/// whatever the outcome.
pub fn read_costs_file(path: &Path, options: &ReadOptions) -> Result<Vec<Cost>, anyhow::Error> {
    let file =
        File::open(path).with_context(|| format!("Unable to open: {}", path.display()))?;
    read_costs(file, options)
}

/// Ledger reader. Every line, blank ones included, must hold exactly four
/// comma separated fields; there is no quoting or trimming, so a field is
/// exactly what sits between two commas. Costs come back in file order.
pub fn read_costs<R: std::io::Read>(
    reader: R,
    options: &ReadOptions,
) -> Result<Vec<Cost>, anyhow::Error> {
    if let Some(cutoff) = options.cutoff {
        info!("Ignoring any entries < {}", cutoff.format(DATE_FORMAT));
    }
    let mut costs = Vec::new();
    let mut dropped = 0usize;
    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let line = line.context("Unable to read ledger")?;
        let number = index as u64 + 1;
        let record: StringRecord = line.split(',').collect();
        if record.len() != FIELDS {
            return Err(Error::FieldCount {
                line: number,
                found: record.len(),
                content: line,
            }
            .into());
        }
        let raw: RawCost = record.deserialize(None)?;
        match parse_cost(number, raw, options.cutoff)? {
            Some(cost) => costs.push(cost),
            None => dropped += 1,
        }
    }
    debug!("Read {} costs, dropped {} older ones", costs.len(), dropped);
    Ok(costs)
}

/// Converts the raw fields of line `line`. Returns `Ok(None)` when the cost is
/// older than `cutoff`; the amount of such a line is never looked at.
pub(crate) fn parse_cost(
    line: u64,
    raw: RawCost,
    cutoff: Option<NaiveDate>,
) -> Result<Option<Cost>, Error> {
    let date = parse_date(&raw.date).ok_or_else(|| Error::Date {
        line,
        value: raw.date.clone(),
    })?;
    if cutoff.map_or(false, |cutoff| date < cutoff) {
        return Ok(None);
    }
    let amount = parse_amount(&raw.amount).ok_or_else(|| Error::Amount {
        line,
        value: raw.amount.clone(),
    })?;
    Ok(Some(Cost {
        date,
        source: raw.source,
        amount,
        note: raw.note,
    }))
}

/// `YYYY-MM-DD`, zero padded, nothing around it.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let layout_ok = s.len() == 10
        && s.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !layout_ok {
        return None;
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

/// Plain or scientific base 10 number. `Decimal::from_str` also takes digit
/// separators, which a ledger amount never has.
fn parse_amount(s: &str) -> Option<Decimal> {
    if s.is_empty()
        || !s
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'+' | b'-' | b'e' | b'E'))
    {
        return None;
    }
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}
