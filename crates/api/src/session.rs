//! Bearer-token session extractor

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use roombook_domain::{RoombookError, Session};

use crate::context::AppContext;
use crate::error::ApiError;

/// The caller's live session. Rejects with 401 when the `Authorization`
/// header is missing or names no live session.
#[derive(Debug, Clone)]
pub struct CurrentSession(pub Session);

/// Bearer token carried by the request, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return None;
    }
    Some(token.trim())
}

impl FromRequestParts<Arc<AppContext>> for CurrentSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &Arc<AppContext>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| RoombookError::Unauthorized("missing bearer token".into()))?;

        ctx.sessions
            .get(token)
            .await
            .map(CurrentSession)
            .ok_or_else(|| RoombookError::Unauthorized("session expired or unknown".into()).into())
    }
}
