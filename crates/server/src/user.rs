//! Profile and user directory endpoints.

use api_types::{
    Pagination,
    user::{ProfileUpdate, UserListQuery, UserListResponse, UserView},
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use engine::{PageMeta, PageRequest, ProfilePatch, User};

use crate::{AuthUser, JsonBody, ServerError, server::ServerState};

pub(crate) fn map_role(role: engine::Role) -> api_types::Role {
    match role {
        engine::Role::Admin => api_types::Role::Admin,
        engine::Role::User => api_types::Role::User,
    }
}

pub(crate) fn user_view(user: &User) -> UserView {
    UserView {
        id: user.id.to_string(),
        name: user.name.clone(),
        email: user.email.clone(),
        role: map_role(user.role),
        avatar: user.avatar.clone(),
        created_at: user.created_at,
    }
}

pub(crate) fn pagination(meta: PageMeta) -> Pagination {
    Pagination {
        current_page: meta.current_page,
        total_pages: meta.total_pages,
        total_items: meta.total_items,
        items_per_page: meta.items_per_page,
    }
}

pub async fn profile(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<UserView>, ServerError> {
    let user = state.engine.user(user.id).await?;
    Ok(Json(user_view(&user)))
}

pub async fn update_profile(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<ProfileUpdate>,
) -> Result<Json<UserView>, ServerError> {
    let patch = ProfilePatch {
        name: payload.name,
        email: payload.email,
        avatar: payload.avatar,
    };
    let user = state.engine.update_profile(user.id, patch).await?;
    Ok(Json(user_view(&user)))
}

/// Admin-only, not owner scoped.
pub async fn list(
    Extension(user): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<UserListResponse>, ServerError> {
    let page = PageRequest::parse(query.page.as_deref(), query.limit.as_deref());
    let result = state
        .engine
        .list_users(user.role, query.search.as_deref(), page)
        .await?;

    Ok(Json(UserListResponse {
        users: result.items.iter().map(user_view).collect(),
        pagination: pagination(result.meta),
    }))
}
