//! Transactions API endpoints

use api_types::{
    MessageBody,
    stats::{CategoryStat, StatsResponse, TypeCategoryStats, TypeStat},
    transaction::{
        DateRangeQuery, TransactionListQuery, TransactionListResponse, TransactionNew,
        TransactionUpdate, TransactionView,
    },
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{
    NewTransactionCmd, PageRequest, Transaction, TransactionPatch, TransactionQuery,
    TransactionType, pagination::paginate, parse_date, parse_optional_date, sample,
};
use uuid::Uuid;

use crate::{AuthUser, JsonBody, ServerError, server::ServerState, user::pagination};

pub(crate) fn map_kind(kind: TransactionType) -> api_types::TransactionType {
    match kind {
        TransactionType::Income => api_types::TransactionType::Income,
        TransactionType::Expense => api_types::TransactionType::Expense,
    }
}

fn transaction_view(tx: Transaction) -> TransactionView {
    TransactionView {
        id: tx.id.to_string(),
        user_id: tx.user_id.to_string(),
        kind: map_kind(tx.kind),
        amount_minor: tx.amount.cents(),
        description: tx.description,
        category: tx.category,
        date: tx.date,
        notes: tx.notes,
        tags: tx.tags,
        created_at: tx.created_at,
        updated_at: tx.updated_at,
    }
}

/// Build the owner-scoped query for the list endpoints.
fn list_query(owner: Uuid, params: &TransactionListQuery) -> Result<TransactionQuery, ServerError> {
    Ok(TransactionQuery::new(owner)
        .kind_param(params.kind.as_deref())
        .category(params.category.as_deref())
        .search(params.search.as_deref())
        .start_date(parse_optional_date(params.start_date.as_deref(), "startDate")?)
        .end_date(parse_optional_date(params.end_date.as_deref(), "endDate")?)
        .sort_params(params.sort_by.as_deref(), params.sort_order.as_deref()))
}

/// Blank strings count as absent.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn list(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(params): Query<TransactionListQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let query = list_query(user.id, &params)?;
    let page = PageRequest::parse(params.page.as_deref(), params.limit.as_deref());
    let result = state.engine.list_transactions(&query, page).await?;

    let views = result.map(transaction_view);
    Ok(Json(TransactionListResponse {
        transactions: views.items,
        pagination: pagination(views.meta),
    }))
}

/// Same parameters as [`list`], evaluated in memory over the demo set.
pub async fn sample(
    Query(params): Query<TransactionListQuery>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let query = list_query(sample::SAMPLE_OWNER_ID, &params)?;
    let page = PageRequest::parse(params.page.as_deref(), params.limit.as_deref());
    let result = paginate(query.apply(sample::sample_transactions()), page);

    let views = result.map(transaction_view);
    Ok(Json(TransactionListResponse {
        transactions: views.items,
        pagination: pagination(views.meta),
    }))
}

pub async fn stats(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(params): Query<DateRangeQuery>,
) -> Result<Json<StatsResponse>, ServerError> {
    let query = TransactionQuery::new(user.id)
        .start_date(parse_optional_date(params.start_date.as_deref(), "startDate")?)
        .end_date(parse_optional_date(params.end_date.as_deref(), "endDate")?);
    let stats = state.engine.transaction_stats(&query).await?;

    Ok(Json(StatsResponse {
        stats: stats
            .types
            .iter()
            .map(|stat| TypeStat {
                kind: map_kind(stat.kind),
                total: stat.total.cents(),
                count: stat.count,
                avg_amount: stat.avg_amount(),
            })
            .collect(),
        category_stats: stats
            .categories
            .into_iter()
            .map(|(kind, categories)| TypeCategoryStats {
                kind: map_kind(kind),
                categories: categories
                    .into_iter()
                    .map(|c| CategoryStat {
                        name: c.name,
                        total: c.total.cents(),
                        count: c.count,
                    })
                    .collect(),
            })
            .collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let (Some(kind), Some(amount_minor), Some(description), Some(category), Some(date)) = (
        present(payload.kind),
        payload.amount_minor,
        present(payload.description),
        present(payload.category),
        present(payload.date),
    ) else {
        return Err(ServerError::BadRequest(
            "All required fields must be provided".to_string(),
        ));
    };

    let mut cmd = NewTransactionCmd::new(
        user.id,
        TransactionType::try_from(kind.trim())?,
        amount_minor,
        description,
        category,
        parse_date(&date, "date")?,
    )
    .tags(payload.tags.unwrap_or_default());
    if let Some(notes) = payload.notes {
        cmd = cmd.notes(notes);
    }

    let tx = state.engine.create_transaction(cmd).await?;
    Ok((StatusCode::CREATED, Json(transaction_view(tx))))
}

pub async fn update(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let patch = TransactionPatch {
        kind: present(payload.kind)
            .map(|k| TransactionType::try_from(k.trim()))
            .transpose()?,
        amount_minor: payload.amount_minor,
        description: present(payload.description),
        category: present(payload.category),
        date: present(payload.date)
            .map(|d| parse_date(&d, "date"))
            .transpose()?,
        notes: payload.notes,
        tags: payload.tags,
    };

    let tx = state.engine.update_transaction(user.id, &id, patch).await?;
    Ok(Json(transaction_view(tx)))
}

pub async fn delete(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, ServerError> {
    state.engine.delete_transaction(user.id, &id).await?;
    Ok(Json(MessageBody {
        message: "Transaction deleted successfully".to_string(),
    }))
}
