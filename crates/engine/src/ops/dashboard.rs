use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    ResultEngine, TransactionQuery, TransactionType,
    aggregation::{self, CategoryTotal, Granularity, PeriodTotals, Totals},
    summary::{DashboardPeriod, RevenuePeriod, Summary, months_back},
};

use super::Engine;

/// Trailing window of the expense and profit/loss charts.
const TRAILING_MONTHS: u32 = 12;

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardOverview {
    pub summary: Summary,
    pub monthly: Vec<PeriodTotals>,
    pub income_categories: Vec<CategoryTotal>,
    pub expense_categories: Vec<CategoryTotal>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExpenseReport {
    pub categories: Vec<CategoryTotal>,
    pub monthly: Vec<PeriodTotals>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProfitLoss {
    pub monthly: Vec<PeriodTotals>,
    pub totals: Totals,
}

impl Engine {
    /// Headline figures, monthly series and top categories from the start of
    /// `period` on. Growth compares against the equally long window right
    /// before it.
    pub async fn dashboard_overview(
        &self,
        user_id: Uuid,
        period: DashboardPeriod,
        today: NaiveDate,
    ) -> ResultEngine<DashboardOverview> {
        let current = self
            .query_transactions(&TransactionQuery::new(user_id).start_date(Some(period.start(today))))
            .await?;
        let (prior_start, prior_end) = period.prior_range(today);
        let prior = self
            .query_transactions(
                &TransactionQuery::new(user_id)
                    .start_date(Some(prior_start))
                    .end_date(Some(prior_end)),
            )
            .await?;

        Ok(DashboardOverview {
            summary: Summary::with_prior(&aggregation::totals(&current), &aggregation::totals(&prior)),
            monthly: aggregation::periodic_series(&current, Granularity::Month),
            income_categories: aggregation::category_breakdown(&current, TransactionType::Income),
            expense_categories: aggregation::category_breakdown(&current, TransactionType::Expense),
        })
    }

    /// Income per month over the last year, or per year over the last three.
    pub async fn revenue_series(
        &self,
        user_id: Uuid,
        period: RevenuePeriod,
        today: NaiveDate,
    ) -> ResultEngine<Vec<PeriodTotals>> {
        let income = self
            .query_transactions(
                &TransactionQuery::new(user_id)
                    .kind(TransactionType::Income)
                    .start_date(Some(period.start(today))),
            )
            .await?;
        let granularity = match period {
            RevenuePeriod::Monthly => Granularity::Month,
            RevenuePeriod::Yearly => Granularity::Year,
        };
        Ok(aggregation::periodic_series(&income, granularity))
    }

    /// Every expense category and the monthly expense series over the last
    /// year.
    pub async fn expense_report(&self, user_id: Uuid, today: NaiveDate) -> ResultEngine<ExpenseReport> {
        let expenses = self
            .query_transactions(
                &TransactionQuery::new(user_id)
                    .kind(TransactionType::Expense)
                    .start_date(Some(months_back(today, TRAILING_MONTHS))),
            )
            .await?;
        Ok(ExpenseReport {
            categories: aggregation::category_totals(&expenses, TransactionType::Expense),
            monthly: aggregation::periodic_series(&expenses, Granularity::Month),
        })
    }

    /// Monthly revenue, expenses and profit over the last year with totals.
    pub async fn profit_loss(&self, user_id: Uuid, today: NaiveDate) -> ResultEngine<ProfitLoss> {
        let txs = self
            .query_transactions(
                &TransactionQuery::new(user_id).start_date(Some(months_back(today, TRAILING_MONTHS))),
            )
            .await?;
        Ok(ProfitLoss {
            monthly: aggregation::periodic_series(&txs, Granularity::Month),
            totals: aggregation::totals(&txs),
        })
    }
}
