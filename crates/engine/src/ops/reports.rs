use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    ReportSpec, ResultEngine, TransactionQuery, TransactionType,
    export::{self, DashboardExport, ExportFormat, Report, ReportFilters, ReportOutput, ReportPeriod},
    query::{SortKey, SortOrder},
    util::parse_date,
};

use super::Engine;

/// Type names a report selects when the caller gives none.
fn default_types() -> Vec<String> {
    TransactionType::ALL
        .iter()
        .map(|kind| kind.as_str().to_string())
        .collect()
}

impl Engine {
    /// CSV of every match of `query`, newest first.
    pub async fn export_csv(&self, query: TransactionQuery) -> ResultEngine<String> {
        let query = query.sort(SortKey::Date, SortOrder::Desc);
        let txs = self.query_transactions(&query).await?;
        Ok(export::to_csv(&txs))
    }

    /// All of the user's transactions with summary and per-category flows.
    pub async fn export_dashboard(
        &self,
        user_id: Uuid,
        period: &str,
        now: DateTime<Utc>,
    ) -> ResultEngine<DashboardExport> {
        let query = TransactionQuery::new(user_id).sort(SortKey::Date, SortOrder::Desc);
        let txs = self.query_transactions(&query).await?;
        Ok(DashboardExport::new(user_id, period, txs, now))
    }

    /// Custom report. Dates filter only when both are given; unknown type
    /// names are dropped.
    pub async fn custom_report(
        &self,
        user_id: Uuid,
        spec: ReportSpec,
        now: DateTime<Utc>,
    ) -> ResultEngine<ReportOutput> {
        let mut query = TransactionQuery::new(user_id)
            .categories_in(spec.include_categories.clone())
            .categories_not_in(spec.exclude_categories.clone())
            .sort(SortKey::Date, SortOrder::Desc);

        let types = spec.types.clone().unwrap_or_else(default_types);
        if !types.is_empty() {
            let kinds: Vec<TransactionType> = types
                .iter()
                .filter_map(|raw| match TransactionType::try_from(raw.trim()) {
                    Ok(kind) => Some(kind),
                    Err(_) => {
                        tracing::debug!("ignoring unknown report type {raw:?}");
                        None
                    }
                })
                .collect();
            query = query.kinds(kinds);
        }

        let start = spec.start_date.as_deref().filter(|s| !s.trim().is_empty());
        let end = spec.end_date.as_deref().filter(|s| !s.trim().is_empty());
        if let (Some(start), Some(end)) = (start, end) {
            query = query
                .start_date(Some(parse_date(start, "startDate")?))
                .end_date(Some(parse_date(end, "endDate")?));
        }

        let txs = self.query_transactions(&query).await?;
        Ok(match spec.format {
            ExportFormat::Csv => ReportOutput::Csv(export::to_csv(&txs)),
            ExportFormat::Json => ReportOutput::Json(Box::new(Report::new(
                ReportPeriod {
                    start_date: spec.start_date,
                    end_date: spec.end_date,
                },
                ReportFilters {
                    include_categories: spec.include_categories,
                    exclude_categories: spec.exclude_categories,
                    types,
                },
                txs,
                now,
            ))),
        })
    }
}
