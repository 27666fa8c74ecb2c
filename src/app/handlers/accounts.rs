use crate::app::auth::CurrentUser;
use crate::app::SharedState;
use crate::core::Storage;
use crate::domain::model::{SessionView, UserView};
use crate::domain::requests::{LoginRequest, PasswordUpdate, ProfileUpdate, SignupRequest};
use crate::utils::error::TradeError;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

type ApiResult<T> = Result<T, TradeError>;

/// POST /core/signup
pub async fn signup<S: Storage>(
    State(state): State<SharedState<S>>,
    Json(request): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<UserView>)> {
    let user = state.accounts.signup(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /core/login
pub async fn login<S: Storage>(
    State(state): State<SharedState<S>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<SessionView>> {
    Ok(Json(state.accounts.login(request).await?))
}

/// GET /core/profile
pub async fn get_profile<S: Storage>(
    State(state): State<SharedState<S>>,
    current: CurrentUser,
) -> ApiResult<Json<UserView>> {
    Ok(Json(state.accounts.profile(current.user.id).await?))
}

/// PUT|PATCH /core/profile
pub async fn update_profile<S: Storage>(
    State(state): State<SharedState<S>>,
    current: CurrentUser,
    Json(update): Json<ProfileUpdate>,
) -> ApiResult<Json<UserView>> {
    Ok(Json(
        state.accounts.update_profile(current.user.id, update).await?,
    ))
}

/// DELETE /core/profile ends the session; the account itself is kept.
pub async fn logout<S: Storage>(
    State(state): State<SharedState<S>>,
    current: CurrentUser,
) -> StatusCode {
    state.accounts.logout(&current.token).await;
    StatusCode::NO_CONTENT
}

/// PUT|PATCH /core/update_password
pub async fn update_password<S: Storage>(
    State(state): State<SharedState<S>>,
    current: CurrentUser,
    Json(update): Json<PasswordUpdate>,
) -> ApiResult<Json<UserView>> {
    Ok(Json(
        state.accounts.update_password(current.user.id, update).await?,
    ))
}
