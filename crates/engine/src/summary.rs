//! Summary Calculator: headline metrics and dashboard date windows.

use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::{MoneyCents, aggregation::Totals, money::percent_of};

/// Reporting window of the dashboard overview.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DashboardPeriod {
    Weekly,
    #[default]
    Monthly,
    Yearly,
}

impl DashboardPeriod {
    /// Unknown or missing values fall back to [`DashboardPeriod::Monthly`].
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("weekly") => Self::Weekly,
            Some("yearly") => Self::Yearly,
            _ => Self::Monthly,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// First day of the window containing `today`. The window has no upper
    /// bound.
    #[must_use]
    pub fn start(self, today: NaiveDate) -> NaiveDate {
        match self {
            Self::Weekly => today - Duration::days(7),
            Self::Monthly => today.with_day(1).unwrap_or(today),
            Self::Yearly => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
        }
    }

    /// Closed range of equal length ending the day before [`Self::start`].
    #[must_use]
    pub fn prior_range(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = self.start(today);
        let days = (today - start).num_days() + 1;
        (start - Duration::days(days), start - Duration::days(1))
    }
}

/// Series window for the revenue chart.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RevenuePeriod {
    #[default]
    Monthly,
    Yearly,
}

impl RevenuePeriod {
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("yearly") => Self::Yearly,
            _ => Self::Monthly,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// Twelve months back for monthly series, three years for yearly ones.
    #[must_use]
    pub fn start(self, today: NaiveDate) -> NaiveDate {
        match self {
            Self::Monthly => months_back(today, 12),
            Self::Yearly => months_back(today, 36),
        }
    }
}

/// `today` moved back by `months`, clamped to the end of shorter months.
#[must_use]
pub fn months_back(today: NaiveDate, months: u32) -> NaiveDate {
    today.checked_sub_months(Months::new(months)).unwrap_or(today)
}

/// `(current - prior) / prior * 100`; `0.0` when there is no prior value.
#[must_use]
pub fn growth_percent(current: MoneyCents, prior: MoneyCents) -> f64 {
    percent_of(current - prior, prior)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    pub total_revenue: MoneyCents,
    pub total_expenses: MoneyCents,
    pub net_profit: MoneyCents,
    pub profit_margin: f64,
    pub transaction_count: u64,
    pub revenue_growth: f64,
    pub expense_growth: f64,
}

impl Summary {
    /// Headline figures without a comparison period.
    #[must_use]
    pub fn from_totals(totals: &Totals) -> Self {
        Self {
            total_revenue: totals.revenue,
            total_expenses: totals.expenses,
            net_profit: totals.net(),
            profit_margin: totals.margin(),
            transaction_count: totals.count(),
            revenue_growth: 0.0,
            expense_growth: 0.0,
        }
    }

    /// Headline figures with growth against `prior`.
    #[must_use]
    pub fn with_prior(totals: &Totals, prior: &Totals) -> Self {
        Self {
            revenue_growth: growth_percent(totals.revenue, prior.revenue),
            expense_growth: growth_percent(totals.expenses, prior.expenses),
            ..Self::from_totals(totals)
        }
    }
}
