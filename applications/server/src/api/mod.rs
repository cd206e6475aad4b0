/// HTTP routes
pub mod albums;
pub mod auth;
pub mod health;
pub mod seed;

use crate::state::AppState;
use axum::{response::Redirect, routing::get, Router};
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

/// Build the application router
pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/albums") }))
        .route("/health", get(health::health))
        // Albums
        .route("/albums", get(albums::list_albums))
        .route(
            "/albums/new",
            get(albums::new_album_page).post(albums::create_album),
        )
        .route(
            "/albums/:id",
            get(albums::get_album).post(albums::album_action),
        )
        .route(
            "/albums/:id/edit",
            get(albums::edit_album_page).post(albums::update_album),
        )
        // Sessions
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", get(auth::logout_page).post(auth::logout))
        // Development data
        .route("/seed", get(seed::seed_report).post(seed::reseed))
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .with_state(app_state)
}
