/// Seeding API routes
use crate::{
    api::albums::IntentForm,
    error::Result,
    seed::{self, SeedReport},
    state::AppState,
};
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};

/// GET /seed
pub async fn seed_report(State(app_state): State<AppState>) -> Result<Json<SeedReport>> {
    Ok(Json(seed::report(&*app_state.store).await?))
}

/// POST /seed
///
/// `intent=seed` replaces the database contents; anything else shows the report.
pub async fn reseed(
    State(app_state): State<AppState>,
    Form(form): Form<IntentForm>,
) -> Result<Response> {
    if form.intent != "seed" {
        return Ok(Json(seed::report(&*app_state.store).await?).into_response());
    }

    let report = seed::reseed(&*app_state.store, &app_state.auth_service).await?;
    tracing::info!(
        "Database seeded with {} users and {} albums",
        report.db_users_count,
        report.db_albums_count
    );
    Ok(Redirect::to("/").into_response())
}
