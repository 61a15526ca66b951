//! Dashboard endpoints. Windows are computed relative to the current UTC
//! date.

use api_types::dashboard::{
    CategorySlice, CategoryTotal, ExpensePoint, ExpensesResponse, Overview, OverviewResponse,
    PeriodQuery, PeriodRow, ProfitLossResponse, ProfitLossSummary, RevenuePoint, RevenueResponse,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::{NaiveDate, Utc};
use engine::{
    aggregation::{self, PeriodTotals},
    summary::{DashboardPeriod, RevenuePeriod},
};

use crate::{AuthUser, ServerError, server::ServerState};

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn period_row(p: &PeriodTotals) -> PeriodRow {
    PeriodRow {
        period: p.key.to_string(),
        label: p.key.label(),
        revenue: p.revenue.cents(),
        expenses: p.expenses.cents(),
        profit: p.profit().cents(),
    }
}

fn slices(categories: &[aggregation::CategoryTotal]) -> Vec<CategorySlice> {
    categories
        .iter()
        .enumerate()
        .map(|(i, c)| CategorySlice {
            name: c.name.clone(),
            value: c.total.cents(),
            color: aggregation::breakdown_color(i),
        })
        .collect()
}

pub async fn overview(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<OverviewResponse>, ServerError> {
    let period = DashboardPeriod::parse(query.period.as_deref());
    let data = state
        .engine
        .dashboard_overview(user.id, period, today())
        .await?;
    let summary = data.summary;

    Ok(Json(OverviewResponse {
        overview: Overview {
            total_revenue: summary.total_revenue.cents(),
            total_expenses: summary.total_expenses.cents(),
            net_profit: summary.net_profit.cents(),
            profit_margin: summary.profit_margin,
            revenue_growth: summary.revenue_growth,
            expense_growth: summary.expense_growth,
        },
        monthly_data: data.monthly.iter().map(period_row).collect(),
        category_breakdown: slices(&data.income_categories),
        expense_categories: slices(&data.expense_categories),
    }))
}

pub async fn revenue(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<RevenueResponse>, ServerError> {
    let period = RevenuePeriod::parse(query.period.as_deref());
    let series = state
        .engine
        .revenue_series(user.id, period, today())
        .await?;

    Ok(Json(RevenueResponse {
        data: series
            .iter()
            .map(|p| RevenuePoint {
                period: p.key.to_string(),
                label: p.key.label(),
                revenue: p.revenue.cents(),
            })
            .collect(),
        period: period.as_str().to_string(),
    }))
}

pub async fn expenses(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<ExpensesResponse>, ServerError> {
    let report = state.engine.expense_report(user.id, today()).await?;

    Ok(Json(ExpensesResponse {
        categories: report
            .categories
            .into_iter()
            .map(|c| CategoryTotal {
                name: c.name,
                total: c.total.cents(),
            })
            .collect(),
        monthly: report
            .monthly
            .iter()
            .map(|p| ExpensePoint {
                period: p.key.to_string(),
                label: p.key.label(),
                expenses: p.expenses.cents(),
            })
            .collect(),
    }))
}

pub async fn profit_loss(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<ProfitLossResponse>, ServerError> {
    let data = state.engine.profit_loss(user.id, today()).await?;

    Ok(Json(ProfitLossResponse {
        monthly: data.monthly.iter().map(period_row).collect(),
        summary: ProfitLossSummary {
            total_revenue: data.totals.revenue.cents(),
            total_expenses: data.totals.expenses.cents(),
            net_profit: data.totals.net().cents(),
            profit_margin: data.totals.margin(),
        },
    }))
}
