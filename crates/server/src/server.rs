use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use std::sync::Arc;

use crate::{
    auth::{self, AuthConfig},
    dashboard, export, transactions, user,
};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub auth: Arc<AuthConfig>,
}

impl ServerState {
    pub fn new(engine: Engine, auth: AuthConfig) -> Self {
        Self {
            engine: Arc::new(engine),
            auth: Arc::new(auth),
        }
    }
}

/// Every route of the API. Only login, register and the sample listing are
/// reachable without a bearer token.
pub fn router(state: ServerState) -> Router {
    let protected = Router::new()
        .route("/users", get(user::list))
        .route("/users/profile", get(user::profile).put(user::update_profile))
        .route("/transactions", get(transactions::list).post(transactions::create))
        .route("/transactions/stats", get(transactions::stats))
        .route(
            "/transactions/{id}",
            put(transactions::update).delete(transactions::delete),
        )
        .route("/dashboard/overview", get(dashboard::overview))
        .route("/dashboard/revenue", get(dashboard::revenue))
        .route("/dashboard/expenses", get(dashboard::expenses))
        .route("/dashboard/profit-loss", get(dashboard::profit_loss))
        .route("/export/transactions/csv", get(export::transactions_csv))
        .route("/export/dashboard/json", get(export::dashboard_json))
        .route("/export/report", post(export::report))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/transactions/sample", get(transactions::sample))
        .merge(protected)
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}
