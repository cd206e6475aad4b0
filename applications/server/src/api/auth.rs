/// Authentication API routes
use crate::{
    error::{FormRejection, Result},
    middleware::auth::LOGIN_PATH,
    services::{AuthError, SignupError},
    session::Session,
    state::AppState,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use serde_json::json;
use shelf_core::UserId;

/// Where a freshly authenticated user lands
const HOME_PATH: &str = "/albums";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
    pub repeat_password: String,
}

/// Submitted values sent back with a rejected form; passwords are never echoed
#[derive(Debug, Serialize)]
pub struct UsernameValues {
    pub username: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPage {
    pub user_id: Option<UserId>,
}

/// GET /login
pub async fn login_page(session: Session) -> Json<LoginPage> {
    Json(LoginPage {
        user_id: session.user_id().cloned(),
    })
}

/// POST /login
pub async fn login(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let values = UsernameValues {
        username: form.username.clone(),
    };

    let error = match app_state
        .auth_service
        .authenticate(&*app_state.store, &form.username, &form.password)
        .await
    {
        Ok(user) => {
            let jar = Session::commit(jar, &app_state.auth_service, &user.id)?;
            tracing::info!("User {} logged in", user.id);
            return Ok((jar, Redirect::to(HOME_PATH)).into_response());
        }
        Err(error) => error,
    };

    let status = match error {
        AuthError::MissingCredentials => StatusCode::BAD_REQUEST,
        AuthError::UserNotFound => StatusCode::NOT_FOUND,
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthError::Store(e) => return Err(e.into()),
        AuthError::Server(e) => return Err(e),
    };

    Ok(FormRejection::message(status, error.to_string(), values).into_response())
}

/// GET /signup
///
/// Signed-in users are sent to their albums.
pub async fn signup_page(session: Session) -> Response {
    if session.is_authenticated() {
        return Redirect::to(HOME_PATH).into_response();
    }
    Json(json!({})).into_response()
}

/// POST /signup
pub async fn signup(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> Result<Response> {
    let result = app_state
        .auth_service
        .register(
            &*app_state.store,
            &form.username,
            &form.password,
            &form.repeat_password,
        )
        .await;

    match result {
        Ok(user) => {
            let jar = Session::commit(jar, &app_state.auth_service, &user.id)?;
            Ok((jar, Redirect::to(HOME_PATH)).into_response())
        }
        Err(SignupError::Store(e)) => Err(e.into()),
        Err(SignupError::Server(e)) => Err(e),
        Err(e) => {
            let values = UsernameValues {
                username: form.username.trim().to_string(),
            };
            Ok(FormRejection::message(StatusCode::BAD_REQUEST, e.to_string(), values)
                .into_response())
        }
    }
}

/// POST /logout
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (Session::destroy(jar), Redirect::to(LOGIN_PATH))
}

/// GET /logout
///
/// Only a form post ends the session.
pub async fn logout_page() -> Redirect {
    Redirect::to(LOGIN_PATH)
}
