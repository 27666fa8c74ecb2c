use crate::app::SharedState;
use crate::core::admin::require_staff;
use crate::core::{Storage, User};
use crate::utils::error::TradeError;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

/// Authenticated caller, resolved from an `Authorization: Bearer <token>`
/// (or `Token <token>`) header.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

/// Authenticated caller with staff rights.
#[derive(Debug, Clone)]
pub struct StaffUser(pub User);

pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    match scheme {
        "Bearer" | "Token" => Some(token.to_string()),
        _ => None,
    }
}

#[async_trait::async_trait]
impl<S: Storage> FromRequestParts<SharedState<S>> for CurrentUser {
    type Rejection = TradeError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState<S>,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers).ok_or(TradeError::NotAuthenticated)?;
        let user = state.accounts.authenticate(&token).await?;
        Ok(CurrentUser { user, token })
    }
}

#[async_trait::async_trait]
impl<S: Storage> FromRequestParts<SharedState<S>> for StaffUser {
    type Rejection = TradeError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState<S>,
    ) -> Result<Self, Self::Rejection> {
        let CurrentUser { user, .. } = CurrentUser::from_request_parts(parts, state).await?;
        require_staff(user.is_staff)?;
        Ok(StaffUser(user))
    }
}
