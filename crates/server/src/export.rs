//! File export endpoints.

use api_types::{
    dashboard::PeriodQuery,
    export::{ExportQuery, ReportRequest},
};
use axum::{
    Extension, Json,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use engine::{
    ReportSpec, TransactionQuery,
    export::{ExportFormat, ReportOutput},
    parse_optional_date,
};

use crate::{AuthUser, JsonBody, ServerError, server::ServerState};

const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";
const JSON_CONTENT_TYPE: &str = "application/json";

fn attachment(content_type: &'static str, filename: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={filename}"),
            ),
        ],
        body,
    )
        .into_response()
}

pub async fn transactions_csv(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(params): Query<ExportQuery>,
) -> Result<Response, ServerError> {
    let query = TransactionQuery::new(user.id)
        .kind_param(params.kind.as_deref())
        .category(params.category.as_deref())
        .search(params.search.as_deref())
        .start_date(parse_optional_date(params.start_date.as_deref(), "startDate")?)
        .end_date(parse_optional_date(params.end_date.as_deref(), "endDate")?);
    let csv = state.engine.export_csv(query).await?;

    Ok(attachment(CSV_CONTENT_TYPE, "transactions.csv", csv))
}

pub async fn dashboard_json(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(params): Query<PeriodQuery>,
) -> Result<Response, ServerError> {
    let period = params.period.as_deref().unwrap_or("monthly");
    let export = state
        .engine
        .export_dashboard(user.id, period, Utc::now())
        .await?;
    let body = export.to_json()?;

    Ok(attachment(JSON_CONTENT_TYPE, "dashboard-data.json", body))
}

pub async fn report(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<ReportRequest>,
) -> Result<Response, ServerError> {
    let spec = ReportSpec {
        start_date: payload.start_date,
        end_date: payload.end_date,
        format: ExportFormat::parse(payload.format.as_deref()),
        include_categories: payload.include_categories.unwrap_or_default(),
        exclude_categories: payload.exclude_categories.unwrap_or_default(),
        types: payload.types,
    };

    match state.engine.custom_report(user.id, spec, Utc::now()).await? {
        ReportOutput::Csv(csv) => Ok(attachment(CSV_CONTENT_TYPE, "custom-report.csv", csv)),
        ReportOutput::Json(report) => Ok(Json(report).into_response()),
    }
}
