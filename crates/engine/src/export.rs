//! Export Formatter: CSV and JSON renderings of an already fetched set.
//!
//! Formatting is all-or-nothing: a serialization failure becomes
//! [`EngineError::Export`] and no partial document is produced.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    EngineError, MoneyCents, ResultEngine, Transaction,
    aggregation::{self, CategoryFlow},
    summary::Summary,
};

pub const CSV_HEADER: &str = "Date,Type,Amount,Description,Category,Notes";

/// Requested output of a custom report. Anything but `csv` means JSON.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    #[default]
    Json,
}

impl ExportFormat {
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Json,
        }
    }
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

fn csv_row(tx: &Transaction) -> String {
    format!(
        "{},{},{},{},{},{}",
        tx.date.format("%-m/%-d/%Y"),
        tx.kind.as_str(),
        tx.signed_amount(),
        quote(&tx.description),
        quote(&tx.category),
        quote(&tx.notes),
    )
}

/// Header line plus one line per transaction, in the given order. Text
/// columns are always quoted; expenses carry a negative amount.
pub fn to_csv(txs: &[Transaction]) -> String {
    let mut lines = Vec::with_capacity(txs.len() + 1);
    lines.push(CSV_HEADER.to_string());
    lines.extend(txs.iter().map(csv_row));
    lines.join("\n")
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSummary {
    pub total_revenue: MoneyCents,
    pub total_expenses: MoneyCents,
    pub net_profit: MoneyCents,
    pub profit_margin: f64,
    pub transaction_count: u64,
}

impl From<&Summary> for ExportSummary {
    fn from(summary: &Summary) -> Self {
        Self {
            total_revenue: summary.total_revenue,
            total_expenses: summary.total_expenses,
            net_profit: summary.net_profit,
            profit_margin: summary.profit_margin,
            transaction_count: summary.transaction_count,
        }
    }
}

/// Full dump of a user's dashboard data.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardExport {
    pub summary: ExportSummary,
    pub category_breakdown: BTreeMap<String, CategoryFlow>,
    pub transactions: Vec<Transaction>,
    pub exported_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub period: String,
}

impl DashboardExport {
    pub fn new(
        user_id: Uuid,
        period: impl Into<String>,
        transactions: Vec<Transaction>,
        exported_at: DateTime<Utc>,
    ) -> Self {
        let totals = aggregation::totals(&transactions);
        Self {
            summary: ExportSummary::from(&Summary::from_totals(&totals)),
            category_breakdown: aggregation::category_flows(&transactions),
            transactions,
            exported_at,
            user_id,
            period: period.into(),
        }
    }

    /// Pretty-printed JSON document.
    pub fn to_json(&self) -> ResultEngine<String> {
        serde_json::to_string_pretty(self).map_err(EngineError::from)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPeriod {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilters {
    pub include_categories: Vec<String>,
    pub exclude_categories: Vec<String>,
    pub types: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_income: MoneyCents,
    pub total_expenses: MoneyCents,
    pub net_profit: MoneyCents,
    pub transaction_count: u64,
}

/// Custom report over a filtered set.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub period: ReportPeriod,
    pub filters: ReportFilters,
    pub summary: ReportSummary,
    pub transactions: Vec<Transaction>,
    pub generated_at: DateTime<Utc>,
}

impl Report {
    pub fn new(
        period: ReportPeriod,
        filters: ReportFilters,
        transactions: Vec<Transaction>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let totals = aggregation::totals(&transactions);
        Self {
            period,
            filters,
            summary: ReportSummary {
                total_income: totals.revenue,
                total_expenses: totals.expenses,
                net_profit: totals.net(),
                transaction_count: totals.count(),
            },
            transactions,
            generated_at,
        }
    }
}

/// A rendered custom report.
#[derive(Clone, Debug, PartialEq)]
pub enum ReportOutput {
    Csv(String),
    Json(Box<Report>),
}
