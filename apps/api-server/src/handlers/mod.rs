//! HTTP handlers and route configuration.

mod auth;
mod health;
mod posts;
mod users;

#[cfg(test)]
mod tests;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/logout", web::post().to(auth::logout))
                    .route("/me", web::get().to(auth::me))
                    .route(
                        "/reset-password-request",
                        web::post().to(auth::request_reset),
                    )
                    .route(
                        "/reset-password/{token}",
                        web::post().to(auth::reset_password),
                    ),
            )
            // Timelines
            .route("/feed", web::get().to(posts::followed_feed))
            .route("/explore", web::get().to(posts::explore))
            .route("/posts", web::post().to(posts::create_post))
            // Profiles and the follow graph
            .service(
                web::scope("/users")
                    .route("/me", web::put().to(users::update_me))
                    .route("/{username}", web::get().to(users::get_user))
                    .route("/{username}/follow", web::post().to(users::follow))
                    .route("/{username}/unfollow", web::post().to(users::unfollow)),
            ),
    );
}
