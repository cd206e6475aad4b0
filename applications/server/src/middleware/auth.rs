/// Authentication gate for protected routes
use crate::{error::ServerError, services::AuthService, session::Session};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use shelf_core::{UserId, UserStore};
use shelf_storage::SqliteStore;
use std::sync::Arc;

/// Where unauthenticated requests are sent
pub const LOGIN_PATH: &str = "/login";

/// The user behind a request with a valid session
///
/// Used as an extractor; requests without a session, or whose session names a
/// user that no longer exists, are redirected to the login page before the
/// handler runs.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    pub fn user_id(&self) -> &UserId {
        &self.0
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<AuthService>: FromRef<S>,
    Arc<SqliteStore>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_service = Arc::<AuthService>::from_ref(state);
        let session = Session::from_headers(&parts.headers, &auth_service);

        let Some(user_id) = session.user_id().cloned() else {
            tracing::debug!("No session for {}, redirecting to login", parts.uri.path());
            return Err(Redirect::to(LOGIN_PATH).into_response());
        };

        let store = Arc::<SqliteStore>::from_ref(state);
        match store.get_user(&user_id).await {
            Ok(Some(_)) => Ok(AuthenticatedUser(user_id)),
            Ok(None) => {
                tracing::debug!(
                    "Session user {} no longer exists, redirecting to login",
                    user_id
                );
                Err(Redirect::to(LOGIN_PATH).into_response())
            }
            Err(e) => Err(ServerError::from(e).into_response()),
        }
    }
}
