use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use engine::EngineError;

use api_types::ErrorBody;
pub use auth::{AuthConfig, AuthUser, Claims};
pub use server::{ServerState, router, run_with_listener};

mod auth;
mod dashboard;
mod export;
mod server;
mod transactions;
mod user;

pub mod types {
    pub mod auth {
        pub use api_types::auth::{AuthResponse, Login, Register};
    }

    pub mod user {
        pub use api_types::user::{ProfileUpdate, UserListQuery, UserListResponse, UserView};
    }

    pub mod transaction {
        pub use api_types::transaction::{
            DateRangeQuery, TransactionListQuery, TransactionListResponse, TransactionNew,
            TransactionUpdate, TransactionView,
        };
    }

    pub mod stats {
        pub use api_types::stats::{CategoryStat, StatsResponse, TypeCategoryStats, TypeStat};
    }

    pub mod dashboard {
        pub use api_types::dashboard::{
            ExpensesResponse, OverviewResponse, PeriodQuery, ProfitLossResponse, RevenueResponse,
        };
    }

    pub mod export {
        pub use api_types::export::{ExportQuery, ReportRequest};
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    /// Missing, malformed or expired bearer token.
    Unauthorized,
    BadRequest(String),
    /// Failure outside the engine, e.g. token signing.
    Internal,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Validation(_) | EngineError::DuplicateEmail(_) => StatusCode::BAD_REQUEST,
        EngineError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::NotFound(_) => StatusCode::NOT_FOUND,
        EngineError::Export(_) | EngineError::Hashing(_) | EngineError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        err @ (EngineError::Export(_) | EngineError::Hashing(_)) => {
            tracing::error!("{err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Unauthorized => (StatusCode::UNAUTHORIZED, "Access token required".to_string()),
            ServerError::BadRequest(err) => (StatusCode::BAD_REQUEST, err),
            ServerError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// `Json` request body whose rejections answer with the usual `{error}` body
/// and status 400.
pub(crate) struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
