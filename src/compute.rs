use crate::data::{Cost, Error, MonthKey, SourceTotal};
use rust_decimal::Decimal;
use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
};

/// Everything the report needs, folded from the costs in a single pass. Months
/// live in a `BTreeMap` so iterating them is already chronological; source maps
/// are unordered and get sorted by `sorted_by_amount` when printed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Totals {
    pub total: Decimal,
    pub by_source: HashMap<String, Decimal>,
    pub by_month: BTreeMap<MonthKey, Decimal>,
    pub by_month_source: BTreeMap<MonthKey, HashMap<String, Decimal>>,
}

impl Totals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tally<'a>(costs: impl IntoIterator<Item = &'a Cost>) -> Result<Self, Error> {
        let mut totals = Self::new();
        for cost in costs {
            totals.add(cost)?;
        }
        Ok(totals)
    }

    /// Adds `cost` to every total, or to none of them if any would overflow.
    pub fn add(&mut self, cost: &Cost) -> Result<(), Error> {
        let month = cost.month();
        let overflow = || Error::Overflow {
            name: cost.source.clone(),
            amount: cost.amount,
        };
        let total = self.total.checked_add(cost.amount).ok_or_else(overflow)?;
        let source = plus(self.by_source.get(&cost.source), cost.amount).ok_or_else(overflow)?;
        let in_month = plus(self.by_month.get(&month), cost.amount).ok_or_else(overflow)?;
        let source_in_month = plus(
            self.by_month_source
                .get(&month)
                .and_then(|sources| sources.get(&cost.source)),
            cost.amount,
        )
        .ok_or_else(overflow)?;

        self.total = total;
        self.by_source.insert(cost.source.clone(), source);
        self.by_month.insert(month, in_month);
        self.by_month_source
            .entry(month)
            .or_default()
            .insert(cost.source.clone(), source_in_month);
        Ok(())
    }

    /// Lifetime source totals, biggest first.
    pub fn sources(&self) -> Vec<SourceTotal> {
        sorted_by_amount(&self.by_source)
    }

    /// Per-month totals in chronological order.
    pub fn months(&self) -> impl Iterator<Item = (MonthKey, Decimal)> + '_ {
        self.by_month.iter().map(|(month, amount)| (*month, *amount))
    }

    /// Per-month source totals, months in chronological order and sources
    /// biggest first within each month.
    pub fn month_sources(&self) -> impl Iterator<Item = (MonthKey, Vec<SourceTotal>)> + '_ {
        self.by_month_source
            .iter()
            .map(|(month, sources)| (*month, sorted_by_amount(sources)))
    }
}

fn plus(current: Option<&Decimal>, amount: Decimal) -> Option<Decimal> {
    current.copied().unwrap_or_default().checked_add(amount)
}

/// Descending by amount; equal amounts fall back to the name so the output
/// never depends on hash order.
pub fn by_amount_desc(a: &SourceTotal, b: &SourceTotal) -> Ordering {
    b.amount.cmp(&a.amount).then_with(|| a.name.cmp(&b.name))
}

fn sorted_by_amount(sources: &HashMap<String, Decimal>) -> Vec<SourceTotal> {
    let mut sorted: Vec<_> = sources
        .iter()
        .map(|(name, amount)| SourceTotal {
            name: name.clone(),
            amount: *amount,
        })
        .collect();
    sorted.sort_by(by_amount_desc);
    sorted
}

/// Costs ordered by date; costs on the same day keep their file order.
pub fn sorted_by_date(costs: &[Cost]) -> Vec<&Cost> {
    let mut sorted: Vec<_> = costs.iter().collect();
    sorted.sort_by_key(|cost| cost.date);
    sorted
}

#[cfg(test)]
mod tests {
    use super::{sorted_by_date, Totals};
    use crate::data::{Cost, Error, MonthKey, SourceTotal};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn cost(date: &str, source: &str, amount: Decimal) -> Cost {
        Cost {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            source: source.into(),
            amount,
            note: String::new(),
        }
    }

    fn scenario() -> Vec<Cost> {
        vec![
            cost("2024-01-05", "Store A", dec!(10.00)),
            cost("2024-01-20", "Store B", dec!(5.00)),
            cost("2024-02-01", "Store A", dec!(7.00)),
        ]
    }

    fn source(name: &str, amount: Decimal) -> SourceTotal {
        SourceTotal {
            name: name.into(),
            amount,
        }
    }

    #[test]
    fn test_tally() {
        let totals = Totals::tally(&scenario()).unwrap();
        assert_eq!(totals.total, dec!(22.00));
        assert_eq!(
            totals.sources(),
            [source("Store A", dec!(17.00)), source("Store B", dec!(5.00))]
        );
        assert_eq!(
            totals.months().collect::<Vec<_>>(),
            [
                (MonthKey::new(2024, 1), dec!(15.00)),
                (MonthKey::new(2024, 2), dec!(7.00)),
            ]
        );
        assert_eq!(
            totals.month_sources().collect::<Vec<_>>(),
            [
                (
                    MonthKey::new(2024, 1),
                    vec![source("Store A", dec!(10.00)), source("Store B", dec!(5.00))]
                ),
                (MonthKey::new(2024, 2), vec![source("Store A", dec!(7.00))]),
            ]
        );
    }

    #[test]
    fn test_sums_agree() {
        let costs = vec![
            cost("2023-12-31", "Rent", dec!(1200)),
            cost("2024-01-01", "rent", dec!(0.1)),
            cost("2024-01-02", "Groceries", dec!(0.2)),
            cost("2024-03-15", "Groceries", dec!(-3.33)),
            cost("2024-03-16", "Rent", dec!(1200)),
        ];
        let totals = Totals::tally(&costs).unwrap();
        let by_source: Decimal = totals.sources().iter().map(|s| s.amount).sum();
        let by_month: Decimal = totals.months().map(|(_, amount)| amount).sum();
        let by_month_source: Decimal = totals
            .month_sources()
            .flat_map(|(_, sources)| sources)
            .map(|s| s.amount)
            .sum();
        assert_eq!(totals.total, dec!(2396.97));
        assert_eq!(by_source, totals.total);
        assert_eq!(by_month, totals.total);
        assert_eq!(by_month_source, totals.total);
        // sources are case sensitive
        assert_eq!(totals.by_source.len(), 3);
    }

    #[test]
    fn test_order_independent() {
        let mut costs = scenario();
        costs.push(cost("2023-11-11", "Store C", dec!(17.00)));
        costs.push(cost("2024-02-14", "Store B", dec!(3.25)));
        let expected = Totals::tally(&costs).unwrap();
        for shift in 1..costs.len() {
            costs.rotate_left(shift);
            assert_eq!(Totals::tally(&costs).unwrap(), expected);
            costs.reverse();
            assert_eq!(Totals::tally(&costs).unwrap(), expected);
        }
    }

    #[test]
    fn test_tie_break_by_name() {
        let costs = vec![
            cost("2024-01-01", "Zeta", dec!(5)),
            cost("2024-01-01", "Alpha", dec!(5)),
            cost("2024-01-01", "Mid", dec!(6)),
        ];
        let names: Vec<_> = Totals::tally(&costs)
            .unwrap()
            .sources()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, ["Mid", "Alpha", "Zeta"]);
    }

    #[test]
    fn test_months_numeric_order() {
        let costs = vec![
            cost("2021-10-01", "A", dec!(1)),
            cost("2022-01-01", "A", dec!(1)),
            cost("2021-09-30", "A", dec!(1)),
        ];
        let months: Vec<_> = Totals::tally(&costs)
            .unwrap()
            .months()
            .map(|(month, _)| month.to_string())
            .collect();
        assert_eq!(months, ["2021-09", "2021-10", "2022-01"]);
    }

    #[test]
    fn test_overflow_is_an_error() {
        let costs = vec![
            cost("2024-01-05", "A", Decimal::MAX),
            cost("2024-01-06", "B", dec!(1)),
        ];
        assert_eq!(
            Totals::tally(&costs),
            Err(Error::Overflow {
                name: "B".into(),
                amount: dec!(1),
            })
        );

        let mut totals = Totals::tally(&costs[..1]).unwrap();
        let before = totals.clone();
        assert!(totals.add(&costs[1]).is_err());
        assert_eq!(totals, before);
    }

    #[test]
    fn test_sorted_by_date_is_stable() {
        let costs = vec![
            cost("2024-01-02", "Second", dec!(1)),
            cost("2024-01-01", "First", dec!(1)),
            cost("2024-01-02", "Third", dec!(1)),
        ];
        let names: Vec<_> = sorted_by_date(&costs)
            .into_iter()
            .map(|c| c.source.as_str())
            .collect();
        assert_eq!(names, ["First", "Second", "Third"]);
    }
}
