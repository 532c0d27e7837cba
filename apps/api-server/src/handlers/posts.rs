//! Feed, explore and post publishing handlers.

use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, web};

use microblog_core::domain::{Page, Post};
use microblog_shared::dto::{CreatePostRequest, PageQuery, PostPageResponse, PostResponse};

use crate::middleware::auth::CurrentUser;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// Render a page of posts, resolving author names and navigation links.
///
/// Links point at `path` with the neighbouring page number, or are `None`
/// when there is no such page.
pub(crate) async fn post_page(
    state: &AppState,
    page: Page<Post>,
    path: &str,
) -> AppResult<PostPageResponse> {
    let mut author_ids: Vec<_> = page.items.iter().map(|p| p.user_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let authors: HashMap<_, _> = state
        .users
        .find_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u.username))
        .collect();

    let link = |n: u64| format!("{}?page={}", path, n);
    let next_url = page.next_num().map(link);
    let prev_url = page.prev_num().map(link);
    let has_next = page.has_next();
    let has_prev = page.has_prev();

    let page = page.map(|post| PostResponse {
        id: post.id,
        author: authors.get(&post.user_id).cloned(),
        body: post.body,
        timestamp: post.timestamp,
    });

    Ok(PostPageResponse {
        items: page.items,
        page: page.page,
        per_page: page.per_page,
        total: page.total,
        has_next,
        has_prev,
        next_url,
        prev_url,
    })
}

/// GET /api/feed
pub async fn followed_feed(
    req: HttpRequest,
    state: web::Data<AppState>,
    user: CurrentUser,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .feed
        .followed_posts(&user.0, state.page_request(query.number()))
        .await?;

    Ok(HttpResponse::Ok().json(post_page(&state, page, req.path()).await?))
}

/// GET /api/explore
pub async fn explore(
    req: HttpRequest,
    state: web::Data<AppState>,
    _user: CurrentUser,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state.feed.explore(state.page_request(query.number())).await?;

    Ok(HttpResponse::Ok().json(post_page(&state, page, req.path()).await?))
}

/// POST /api/posts
pub async fn create_post(
    state: web::Data<AppState>,
    user: CurrentUser,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let CurrentUser(author) = user;
    let post = state.feed.publish(&author, &body.body).await?;

    Ok(HttpResponse::Created().json(PostResponse {
        id: post.id,
        author: Some(author.username),
        body: post.body,
        timestamp: post.timestamp,
    }))
}
