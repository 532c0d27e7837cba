//! Profile and follow handlers.

use actix_web::{HttpRequest, HttpResponse, web};

use microblog_core::domain::User;
use microblog_shared::ApiResponse;
use microblog_shared::dto::{EditProfileRequest, PageQuery, ProfileResponse, UserPageResponse};

use crate::handlers::posts::post_page;
use crate::middleware::auth::CurrentUser;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Public view of `user`. `viewer` is the requesting account, if it differs
/// from `user`; it decides whether `is_following` is reported.
pub(crate) async fn profile_response(
    state: &AppState,
    user: &User,
    viewer: Option<&User>,
) -> AppResult<ProfileResponse> {
    let (followers, following) = state.social.counts(user).await?;
    let is_following = match viewer {
        Some(viewer) => Some(state.social.is_following(viewer, user).await?),
        None => None,
    };

    Ok(ProfileResponse {
        id: user.id,
        username: user.username.clone(),
        about_me: user.about_me.clone(),
        last_seen: user.last_seen,
        followers,
        following,
        is_following,
    })
}

/// GET /api/users/{username}
pub async fn get_user(
    req: HttpRequest,
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let CurrentUser(viewer) = current;
    let user = state.accounts.find_by_username(&path).await?;

    let viewer = (viewer.id != user.id).then_some(&viewer);
    let profile = profile_response(&state, &user, viewer).await?;

    let posts = state
        .feed
        .user_posts(user.id, state.page_request(query.number()))
        .await?;
    let posts = post_page(&state, posts, req.path()).await?;

    Ok(HttpResponse::Ok().json(UserPageResponse {
        user: profile,
        posts,
    }))
}

/// PUT /api/users/me
pub async fn update_me(
    state: web::Data<AppState>,
    current: CurrentUser,
    body: web::Json<EditProfileRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let user = state
        .accounts
        .update_profile(&current.0, &req.username, req.about_me.as_deref())
        .await?;

    let profile = profile_response(&state, &user, None).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        profile,
        "Your changes have been saved.",
    )))
}

/// POST /api/users/{username}/follow
pub async fn follow(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let target = state.social.follow(&current.0, &path).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message(format!(
        "You are following {}!",
        target.username
    ))))
}

/// POST /api/users/{username}/unfollow
pub async fn unfollow(
    state: web::Data<AppState>,
    current: CurrentUser,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let target = state.social.unfollow(&current.0, &path).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::message(format!(
        "You are not following {}.",
        target.username
    ))))
}
