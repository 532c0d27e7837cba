//! Authentication handlers.

use actix_web::cookie::{Cookie, SameSite, time::Duration};
use actix_web::{HttpResponse, web};

use microblog_core::domain::User;
use microblog_shared::dto::{
    AuthResponse, LoginRequest, RegisterUserRequest, ResetPasswordForm, ResetPasswordRequest,
};
use microblog_shared::ApiResponse;

use crate::handlers::users::profile_response;
use crate::middleware::auth::{CurrentUser, Identity, SESSION_COOKIE};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Issue a session token for `user` and build the response body and cookie.
fn session(
    state: &AppState,
    user: &User,
    remember: bool,
) -> AppResult<(AuthResponse, Cookie<'static>)> {
    let token = state
        .tokens
        .generate_token(user.id, &user.username, remember)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    let expires_in = state.tokens.expiration_seconds(remember);

    let cookie = Cookie::build(SESSION_COOKIE, token.clone())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(expires_in))
        .finish();

    Ok((
        AuthResponse {
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_in: expires_in.max(0) as u64,
        },
        cookie,
    ))
}

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .accounts
        .register(&req.username, &req.email, &req.password)
        .await?;

    let (auth, cookie) = session(&state, &user, false)?;
    Ok(HttpResponse::Created().cookie(cookie).json(auth))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let user = state
        .accounts
        .authenticate(&req.username, &req.password)
        .await?;

    tracing::info!(user_id = %user.id, remember = req.remember_me, "User logged in");
    let (auth, cookie) = session(&state, &user, req.remember_me)?;
    Ok(HttpResponse::Ok().cookie(cookie).json(auth))
}

/// POST /api/auth/logout
///
/// Works with or without a valid session; the cookie is cleared either way.
pub async fn logout(identity: Option<Identity>) -> HttpResponse {
    if let Some(identity) = identity {
        tracing::info!(user_id = %identity.user_id, username = %identity.username, "User logged out");
    }

    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();

    HttpResponse::NoContent().cookie(cookie).finish()
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, user: CurrentUser) -> AppResult<HttpResponse> {
    let CurrentUser(user) = user;
    let profile = profile_response(&state, &user, None).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// POST /api/auth/reset-password-request
///
/// Always accepted, so callers cannot probe which addresses are registered.
pub async fn request_reset(
    state: web::Data<AppState>,
    body: web::Json<ResetPasswordRequest>,
) -> AppResult<HttpResponse> {
    state.accounts.request_password_reset(&body.email).await?;

    Ok(HttpResponse::Accepted().json(ApiResponse::message(
        "Check your email for the instructions to reset your password",
    )))
}

/// POST /api/auth/reset-password/{token}
pub async fn reset_password(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ResetPasswordForm>,
) -> AppResult<HttpResponse> {
    let token = path.into_inner();
    state
        .accounts
        .reset_password(&token, &body.password)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message("Your password has been reset.")))
}
