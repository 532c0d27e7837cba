use actix_web::cookie::Cookie;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::json;

use microblog_core::ports::ResetTokenService;
use microblog_infra::{JwtConfig, JwtResetTokenService};
use microblog_shared::ErrorResponse;
use microblog_shared::dto::{AuthResponse, PostPageResponse, ProfileResponse, UserPageResponse};

use super::configure_routes;
use crate::config::AppConfig;
use crate::middleware::auth::SESSION_COOKIE;
use crate::state::AppState;

const PASSWORD: &str = "correct horse";

fn config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 8080,
        database: None,
        posts_per_page: 2,
        public_url: "http://localhost:8080".to_string(),
    }
}

macro_rules! app {
    () => {
        app!(JwtConfig::default())
    };
    ($jwt:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::in_memory(&config(), &$jwt)))
                .configure(configure_routes),
        )
        .await
    };
}

fn register(username: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": PASSWORD,
        }))
}

fn login(username: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "username": username, "password": password }))
}

fn bearer(req: test::TestRequest, auth: &AuthResponse) -> test::TestRequest {
    req.insert_header((
        header::AUTHORIZATION,
        format!("Bearer {}", auth.access_token),
    ))
}

fn publish(auth: &AuthResponse, body: &str) -> test::TestRequest {
    bearer(
        test::TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "body": body })),
        auth,
    )
}

#[actix_web::test]
async fn test_health_reports_in_memory_storage() {
    let app = app!();

    let body: serde_json::Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/health").to_request(),
    )
    .await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "in-memory");
}

#[actix_web::test]
async fn test_register_then_me() {
    let app = app!();

    let resp = test::call_service(&app, register("susan").to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let auth: AuthResponse = test::read_body_json(resp).await;
    assert_eq!(auth.token_type, "Bearer");
    assert_eq!(auth.expires_in, 24 * 3600);

    let me: ProfileResponse = test::call_and_read_body_json(
        &app,
        bearer(test::TestRequest::get().uri("/api/auth/me"), &auth).to_request(),
    )
    .await;
    assert_eq!(me.username, "susan");
    assert_eq!(me.followers, 0);
    assert!(me.is_following.is_none());
}

#[actix_web::test]
async fn test_duplicate_username_conflicts() {
    let app = app!();
    test::call_service(&app, register("susan").to_request()).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "username": "susan",
                "email": "other@example.com",
                "password": PASSWORD,
            }))
            .to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_bad_credentials_are_indistinguishable() {
    let app = app!();
    test::call_service(&app, register("susan").to_request()).await;

    let wrong_password = test::call_service(&app, login("susan", "nope nope").to_request()).await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password: ErrorResponse = test::read_body_json(wrong_password).await;

    let unknown_user = test::call_service(&app, login("nobody", PASSWORD).to_request()).await;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    let unknown_user: ErrorResponse = test::read_body_json(unknown_user).await;

    assert_eq!(wrong_password.detail, unknown_user.detail);
}

#[actix_web::test]
async fn test_protected_routes_require_a_session() {
    let app = app!();

    for uri in ["/api/feed", "/api/explore", "/api/auth/me", "/api/users/susan"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{}", uri);
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/feed")
            .insert_header((header::AUTHORIZATION, "Bearer not-a-token"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_session_cookie_authenticates() {
    let app = app!();
    test::call_service(&app, register("susan").to_request()).await;

    let resp = test::call_service(&app, login("susan", PASSWORD).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .expect("session cookie set")
        .into_owned();
    assert!(cookie.http_only().unwrap_or(false));

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .cookie(Cookie::new(SESSION_COOKIE, cookie.value().to_string()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_remember_me_extends_session() {
    let app = app!();
    test::call_service(&app, register("susan").to_request()).await;

    let auth: AuthResponse = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "username": "susan", "password": PASSWORD, "remember_me": true }))
            .to_request(),
    )
    .await;

    assert_eq!(auth.expires_in, 30 * 24 * 3600);
}

#[actix_web::test]
async fn test_logout_clears_cookie() {
    let app = app!();

    let resp = test::call_service(
        &app,
        test::TestRequest::post().uri("/api/auth/logout").to_request(),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .expect("removal cookie set");
    assert_eq!(cookie.value(), "");
}

#[actix_web::test]
async fn test_feed_contains_own_and_followed_posts_only() {
    let app = app!();
    let susan: AuthResponse =
        test::call_and_read_body_json(&app, register("susan").to_request()).await;
    let john: AuthResponse =
        test::call_and_read_body_json(&app, register("john").to_request()).await;
    let mary: AuthResponse =
        test::call_and_read_body_json(&app, register("mary").to_request()).await;

    test::call_service(&app, publish(&susan, "from susan").to_request()).await;
    test::call_service(&app, publish(&mary, "from mary").to_request()).await;
    test::call_service(&app, publish(&john, "from john").to_request()).await;

    let resp = test::call_service(
        &app,
        bearer(test::TestRequest::post().uri("/api/users/susan/follow"), &john).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let feed: PostPageResponse = test::call_and_read_body_json(
        &app,
        bearer(test::TestRequest::get().uri("/api/feed"), &john).to_request(),
    )
    .await;

    assert_eq!(feed.total, 2);
    let bodies: Vec<_> = feed.items.iter().map(|p| p.body.as_str()).collect();
    assert_eq!(bodies, ["from john", "from susan"]);
    assert_eq!(feed.items[1].author.as_deref(), Some("susan"));
}

#[actix_web::test]
async fn test_explore_pagination_links() {
    let app = app!();
    let susan: AuthResponse =
        test::call_and_read_body_json(&app, register("susan").to_request()).await;
    for n in 1..=5 {
        test::call_service(&app, publish(&susan, &format!("post {}", n)).to_request()).await;
    }

    let explore = |page: &str| {
        bearer(
            test::TestRequest::get().uri(&format!("/api/explore{}", page)),
            &susan,
        )
        .to_request()
    };

    let first: PostPageResponse = test::call_and_read_body_json(&app, explore("")).await;
    assert_eq!(first.page, 1);
    assert_eq!(first.total, 5);
    assert_eq!(first.items[0].body, "post 5");
    assert_eq!(first.next_url.as_deref(), Some("/api/explore?page=2"));
    assert!(first.prev_url.is_none());

    let middle: PostPageResponse = test::call_and_read_body_json(&app, explore("?page=2")).await;
    assert_eq!(middle.next_url.as_deref(), Some("/api/explore?page=3"));
    assert_eq!(middle.prev_url.as_deref(), Some("/api/explore?page=1"));

    let last: PostPageResponse = test::call_and_read_body_json(&app, explore("?page=3")).await;
    assert_eq!(last.items.len(), 1);
    assert!(!last.has_next);
    assert!(last.next_url.is_none());

    let zero: PostPageResponse = test::call_and_read_body_json(&app, explore("?page=0")).await;
    assert_eq!(zero.page, 1);

    let junk: PostPageResponse = test::call_and_read_body_json(&app, explore("?page=abc")).await;
    assert_eq!(junk.page, 1);
    assert_eq!(junk.items[0].body, "post 5");

    let beyond: PostPageResponse = test::call_and_read_body_json(&app, explore("?page=99")).await;
    assert!(beyond.items.is_empty());
    assert!(!beyond.has_next);
    assert!(beyond.has_prev);
}

#[actix_web::test]
async fn test_invalid_post_body_is_rejected() {
    let app = app!();
    let susan: AuthResponse =
        test::call_and_read_body_json(&app, register("susan").to_request()).await;

    let resp = test::call_service(&app, publish(&susan, "   ").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let resp = test::call_service(&app, publish(&susan, &"x".repeat(141)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_follow_errors() {
    let app = app!();
    let susan: AuthResponse =
        test::call_and_read_body_json(&app, register("susan").to_request()).await;

    let resp = test::call_service(
        &app,
        bearer(test::TestRequest::post().uri("/api/users/susan/follow"), &susan).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        bearer(test::TestRequest::post().uri("/api/users/susan/unfollow"), &susan).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        bearer(test::TestRequest::post().uri("/api/users/ghost/follow"), &susan).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_profile_reports_follow_state() {
    let app = app!();
    let susan: AuthResponse =
        test::call_and_read_body_json(&app, register("susan").to_request()).await;
    let john: AuthResponse =
        test::call_and_read_body_json(&app, register("john").to_request()).await;

    let view = |auth: &AuthResponse| {
        bearer(test::TestRequest::get().uri("/api/users/susan"), auth).to_request()
    };

    let page: UserPageResponse = test::call_and_read_body_json(&app, view(&john)).await;
    assert_eq!(page.user.is_following, Some(false));

    test::call_service(
        &app,
        bearer(test::TestRequest::post().uri("/api/users/susan/follow"), &john).to_request(),
    )
    .await;

    let page: UserPageResponse = test::call_and_read_body_json(&app, view(&john)).await;
    assert_eq!(page.user.is_following, Some(true));
    assert_eq!(page.user.followers, 1);
    assert_eq!(page.posts.total, 0);

    let own: UserPageResponse = test::call_and_read_body_json(&app, view(&susan)).await;
    assert!(own.user.is_following.is_none());

    let resp = test::call_service(
        &app,
        bearer(test::TestRequest::get().uri("/api/users/ghost"), &susan).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_update_profile() {
    let app = app!();
    let susan: AuthResponse =
        test::call_and_read_body_json(&app, register("susan").to_request()).await;

    let resp = test::call_service(
        &app,
        bearer(test::TestRequest::put().uri("/api/users/me"), &susan)
            .set_json(json!({ "username": "susie", "about_me": "hello" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let me: ProfileResponse = test::call_and_read_body_json(
        &app,
        bearer(test::TestRequest::get().uri("/api/auth/me"), &susan).to_request(),
    )
    .await;
    assert_eq!(me.username, "susie");
    assert_eq!(me.about_me.as_deref(), Some("hello"));
}

#[actix_web::test]
async fn test_password_reset_flow() {
    let jwt = JwtConfig::default();
    let app = app!(jwt.clone());
    let susan: AuthResponse =
        test::call_and_read_body_json(&app, register("susan").to_request()).await;
    let me: ProfileResponse = test::call_and_read_body_json(
        &app,
        bearer(test::TestRequest::get().uri("/api/auth/me"), &susan).to_request(),
    )
    .await;

    for email in ["susan@example.com", "nobody@example.com"] {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/auth/reset-password-request")
                .set_json(json!({ "email": email }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::ACCEPTED);
    }

    let reset = |token: &str| {
        test::TestRequest::post()
            .uri(&format!("/api/auth/reset-password/{}", token))
            .set_json(json!({ "password": "brand new secret" }))
            .to_request()
    };

    let resp = test::call_service(&app, reset("garbage")).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let token = JwtResetTokenService::new(&jwt)
        .issue_reset_token(me.id)
        .unwrap();
    let resp = test::call_service(&app, reset(&token)).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, login("susan", PASSWORD).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let resp = test::call_service(&app, login("susan", "brand new secret").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
