//! Login, callback and logout endpoints

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Redirect;
use axum::Json;
use roombook_domain::{AccessToken, Result, RoombookError};
use roombook_infra::auth::decode_id_token;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::context::AppContext;
use crate::error::ApiResult;
use crate::session::bearer_token;
use crate::utils::logging::log_request_outcome;

/// Query string the provider redirects back with.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    /// Echo of the `state` handed out by `/auth/login`.
    pub state: Option<String>,
    /// Set when the user denied consent.
    pub error: Option<String>,
}

/// Body returned once a login completes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub token: String,
    pub email: String,
    /// Seconds until the session expires.
    pub expires_in: i64,
}

/// `GET /auth/login`: redirect to the provider's consent screen.
pub async fn login(State(ctx): State<Arc<AppContext>>) -> ApiResult<Redirect> {
    let request = ctx.oauth.authorization_request()?;
    ctx.sessions.remember_login(request.state, request.code_verifier).await;
    Ok(Redirect::to(&request.url))
}

/// `GET /auth/callback`: finish the login and open a session.
pub async fn callback(
    State(ctx): State<Arc<AppContext>>,
    Query(query): Query<CallbackQuery>,
) -> ApiResult<Json<LoginResponse>> {
    let started = Instant::now();
    let result = complete_login(&ctx, query).await;
    log_request_outcome("auth::callback", started.elapsed(), &result);
    Ok(Json(result?))
}

async fn complete_login(ctx: &AppContext, query: CallbackQuery) -> Result<LoginResponse> {
    if let Some(error) = query.error {
        return Err(RoombookError::UpstreamAuth(format!("consent was not granted: {error}")));
    }
    let code = query
        .code
        .ok_or_else(|| RoombookError::Validation("callback is missing the code".into()))?;
    let state = query
        .state
        .ok_or_else(|| RoombookError::Validation("callback is missing the state".into()))?;

    let verifier = ctx
        .sessions
        .take_login(&state)
        .await
        .ok_or_else(|| RoombookError::Unauthorized("unknown or expired login state".into()))?;

    let tokens = ctx.oauth.exchange_code(&code, &verifier).await?;
    let id_token = tokens
        .id_token
        .as_deref()
        .ok_or_else(|| RoombookError::UpstreamAuth("token response carried no ID token".into()))?;
    let identity = decode_id_token(id_token)?;

    ctx.preferences.register_login(&identity.sub, &identity.email).await?;

    let (token, session) = ctx
        .sessions
        .issue(
            identity.sub,
            identity.email,
            AccessToken::new(tokens.access_token),
            tokens.expires_in,
        )
        .await;

    info!(email = %session.email, "user logged in");
    Ok(LoginResponse {
        token,
        expires_in: (session.expires_at - chrono::Utc::now()).num_seconds().max(0),
        email: session.email,
    })
}

/// `POST /auth/logout`: drop the caller's session. Unknown tokens are not an
/// error.
pub async fn logout(State(ctx): State<Arc<AppContext>>, headers: HeaderMap) -> StatusCode {
    if let Some(token) = bearer_token(&headers) {
        ctx.sessions.revoke(token).await;
    }
    StatusCode::NO_CONTENT
}
