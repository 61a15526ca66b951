//! Aggregation Engine: grouped sums over an already filtered transaction set.
//!
//! Every function here is pure; callers fetch the owner-scoped set once and
//! derive overview, periodic series and category rankings from it.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::{MoneyCents, Transaction, TransactionType, money::percent_of};

/// How many categories a breakdown keeps.
pub const TOP_CATEGORIES: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Granularity {
    Day,
    Month,
    Year,
}

/// Bucket of a periodic series. Only the components of the chosen
/// granularity are set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodKey {
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl PeriodKey {
    #[must_use]
    pub fn of(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Day => Self {
                year: date.year(),
                month: Some(date.month()),
                day: Some(date.day()),
            },
            Granularity::Month => Self {
                year: date.year(),
                month: Some(date.month()),
                day: None,
            },
            Granularity::Year => Self {
                year: date.year(),
                month: None,
                day: None,
            },
        }
    }

    /// Short chart label: `Jan`, `Jan 5` or `2024`.
    #[must_use]
    pub fn label(&self) -> String {
        let Some(month) = self.month else {
            return self.year.to_string();
        };
        let Some(first) = NaiveDate::from_ymd_opt(self.year, month, 1) else {
            return self.to_string();
        };
        match self.day {
            Some(day) => format!("{} {day}", first.format("%b")),
            None => first.format("%b").to_string(),
        }
    }
}

/// `2024`, `2024-01` or `2024-01-05`.
impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.month, self.day) {
            (Some(month), Some(day)) => write!(f, "{:04}-{month:02}-{day:02}", self.year),
            (Some(month), None) => write!(f, "{:04}-{month:02}", self.year),
            _ => write!(f, "{:04}", self.year),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeriodTotals {
    pub key: PeriodKey,
    pub revenue: MoneyCents,
    pub expenses: MoneyCents,
}

impl PeriodTotals {
    #[must_use]
    pub fn profit(&self) -> MoneyCents {
        self.revenue - self.expenses
    }
}

/// Income/expense sums of a set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Totals {
    pub revenue: MoneyCents,
    pub expenses: MoneyCents,
    pub income_count: u64,
    pub expense_count: u64,
}

impl Totals {
    #[must_use]
    pub fn net(&self) -> MoneyCents {
        self.revenue - self.expenses
    }

    /// Net over revenue in percent; `0.0` without revenue.
    #[must_use]
    pub fn margin(&self) -> f64 {
        percent_of(self.net(), self.revenue)
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.income_count + self.expense_count
    }
}

pub fn totals(txs: &[Transaction]) -> Totals {
    txs.iter().fold(Totals::default(), |mut acc, tx| {
        match tx.kind {
            TransactionType::Income => {
                acc.revenue += tx.amount;
                acc.income_count += 1;
            }
            TransactionType::Expense => {
                acc.expenses += tx.amount;
                acc.expense_count += 1;
            }
        }
        acc
    })
}

/// Revenue/expenses per period, ascending. Periods without activity are not
/// emitted.
pub fn periodic_series(txs: &[Transaction], granularity: Granularity) -> Vec<PeriodTotals> {
    let mut buckets: BTreeMap<PeriodKey, (MoneyCents, MoneyCents)> = BTreeMap::new();
    for tx in txs {
        let entry = buckets
            .entry(PeriodKey::of(tx.date, granularity))
            .or_default();
        match tx.kind {
            TransactionType::Income => entry.0 += tx.amount,
            TransactionType::Expense => entry.1 += tx.amount,
        }
    }
    buckets
        .into_iter()
        .map(|(key, (revenue, expenses))| PeriodTotals {
            key,
            revenue,
            expenses,
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryTotal {
    pub name: String,
    pub total: MoneyCents,
    pub count: u64,
}

/// Per-category sums for one type, largest first; equal sums are ordered by
/// name.
pub fn category_totals(txs: &[Transaction], kind: TransactionType) -> Vec<CategoryTotal> {
    let mut by_name: HashMap<&str, (MoneyCents, u64)> = HashMap::new();
    for tx in txs.iter().filter(|tx| tx.kind == kind) {
        let entry = by_name.entry(tx.category.as_str()).or_default();
        entry.0 += tx.amount;
        entry.1 += 1;
    }
    let mut out: Vec<CategoryTotal> = by_name
        .into_iter()
        .map(|(name, (total, count))| CategoryTotal {
            name: name.to_string(),
            total,
            count,
        })
        .collect();
    out.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
    out
}

/// The top [`TOP_CATEGORIES`] of [`category_totals`].
pub fn category_breakdown(txs: &[Transaction], kind: TransactionType) -> Vec<CategoryTotal> {
    let mut out = category_totals(txs, kind);
    out.truncate(TOP_CATEGORIES);
    out
}

/// Chart colour for the `index`-th slice of a breakdown (golden-angle hue
/// spacing).
pub fn breakdown_color(index: usize) -> String {
    let hue = (index as f64 * 137.5) % 360.0;
    format!("hsl({hue}, 70%, 50%)")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeStat {
    pub kind: TransactionType,
    pub total: MoneyCents,
    pub count: u64,
}

impl TypeStat {
    /// Mean amount in cents.
    #[must_use]
    pub fn avg_amount(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.total.cents() as f64 / self.count as f64
    }
}

/// Totals per type; types without transactions are omitted.
pub fn type_stats(txs: &[Transaction]) -> Vec<TypeStat> {
    let totals = totals(txs);
    [
        TypeStat {
            kind: TransactionType::Income,
            total: totals.revenue,
            count: totals.income_count,
        },
        TypeStat {
            kind: TransactionType::Expense,
            total: totals.expenses,
            count: totals.expense_count,
        },
    ]
    .into_iter()
    .filter(|stat| stat.count > 0)
    .collect()
}

/// Per-type totals plus per-type category rankings.
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionStats {
    pub types: Vec<TypeStat>,
    pub categories: Vec<(TransactionType, Vec<CategoryTotal>)>,
}

pub fn transaction_stats(txs: &[Transaction]) -> TransactionStats {
    let types = type_stats(txs);
    let categories = types
        .iter()
        .map(|stat| (stat.kind, category_totals(txs, stat.kind)))
        .collect();
    TransactionStats { types, categories }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CategoryFlow {
    pub income: MoneyCents,
    pub expense: MoneyCents,
}

/// Income and expense sums keyed by category name.
pub fn category_flows(txs: &[Transaction]) -> BTreeMap<String, CategoryFlow> {
    let mut out: BTreeMap<String, CategoryFlow> = BTreeMap::new();
    for tx in txs {
        let entry = out.entry(tx.category.clone()).or_default();
        match tx.kind {
            TransactionType::Income => entry.income += tx.amount,
            TransactionType::Expense => entry.expense += tx.amount,
        }
    }
    out
}
