//! Bearer-token authentication: token issuing, the request middleware and
//! the login/register endpoints.

use api_types::auth::{AuthResponse, Login, Register};
use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use chrono::{Duration, Utc};
use engine::{NewUserCmd, Role, User};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{JsonBody, ServerError, server::ServerState, user::user_view};

/// The contents of a JSON Web Token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Id of the authenticated user.
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Issue time, seconds since the epoch.
    pub iat: i64,
    /// Expiry time, seconds since the epoch.
    pub exp: i64,
}

/// Signing material and lifetime for HS256 tokens.
#[derive(Clone)]
pub struct AuthConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(secret: &str, token_ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl: Duration::hours(token_ttl_hours),
        }
    }

    /// Sign a token for `user`, valid for the configured lifetime.
    pub fn issue(&self, user: &User) -> Result<String, ServerError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding_key).map_err(|err| {
            tracing::error!("failed to sign token: {err}");
            ServerError::Internal
        })
    }

    /// Check signature and expiry of `token`.
    pub fn verify(&self, token: &str) -> Result<Claims, ServerError> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|err| {
                tracing::debug!("rejected bearer token: {err}");
                ServerError::Unauthorized
            })
    }
}

/// The acting user, inserted into request extensions by [`require_auth`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl TryFrom<Claims> for AuthUser {
    type Error = ServerError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&claims.sub).map_err(|_| ServerError::Unauthorized)?;
        Ok(Self {
            id,
            email: claims.email,
            role: claims.role,
        })
    }
}

pub(crate) async fn require_auth(
    State(state): State<ServerState>,
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(TypedHeader(Authorization(bearer))) = auth_header else {
        return Err(ServerError::Unauthorized);
    };
    let user = AuthUser::try_from(state.auth.verify(bearer.token())?)?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub async fn login(
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<Login>,
) -> Result<Json<AuthResponse>, ServerError> {
    let (Some(email), Some(password)) = (present(payload.email), present(payload.password)) else {
        return Err(ServerError::BadRequest(
            "Email and password are required".to_string(),
        ));
    };
    if !engine::is_valid_email(&email) {
        return Err(ServerError::BadRequest("Invalid email format".to_string()));
    }

    let user = state.engine.authenticate(&email, &password).await?;
    let token = state.auth.issue(&user)?;
    tracing::info!(user = %user.id, "login");

    Ok(Json(AuthResponse {
        token,
        user: user_view(&user),
    }))
}

pub async fn register(
    State(state): State<ServerState>,
    JsonBody(payload): JsonBody<Register>,
) -> Result<(StatusCode, Json<AuthResponse>), ServerError> {
    let (Some(name), Some(email), Some(password)) = (
        present(payload.name),
        present(payload.email),
        present(payload.password),
    ) else {
        return Err(ServerError::BadRequest(
            "Name, email, and password are required".to_string(),
        ));
    };

    let user = state
        .engine
        .register(NewUserCmd::new(name, email, password))
        .await?;
    let token = state.auth.issue(&user)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: user_view(&user),
        }),
    ))
}
