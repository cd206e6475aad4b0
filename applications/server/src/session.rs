//! Cookie-backed sessions
//!
//! The cookie holds a signed token naming the user. Reading a session never
//! fails: a missing, forged or expired cookie is an empty session. Writes go
//! through the [`CookieJar`] the handler returns with its response.

use crate::{error::Result, services::AuthService};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use shelf_core::UserId;
use std::convert::Infallible;
use std::sync::Arc;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "__session";

/// The session attached to a request
#[derive(Debug, Clone, Default)]
pub struct Session {
    user_id: Option<UserId>,
}

impl Session {
    /// Read the session from request headers
    pub fn from_headers(headers: &HeaderMap, auth_service: &AuthService) -> Self {
        let jar = CookieJar::from_headers(headers);
        let user_id = jar.get(SESSION_COOKIE).and_then(|cookie| {
            auth_service
                .verify_session_token(cookie.value())
                .map_err(|e| tracing::debug!("Ignoring session cookie: {}", e))
                .ok()
        });

        Self { user_id }
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// Store `user_id` in a fresh session cookie
    pub fn commit(
        jar: CookieJar,
        auth_service: &AuthService,
        user_id: &UserId,
    ) -> Result<CookieJar> {
        let token = auth_service.create_session_token(user_id)?;
        let max_age = time::Duration::seconds(auth_service.session_duration().num_seconds());

        let cookie = Cookie::build((SESSION_COOKIE, token))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(max_age);

        Ok(jar.add(cookie))
    }

    /// Expire the session cookie
    pub fn destroy(jar: CookieJar) -> CookieJar {
        jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Session
where
    Arc<AuthService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let auth_service = Arc::<AuthService>::from_ref(state);
        Ok(Session::from_headers(&parts.headers, &auth_service))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BCRYPT_MIN_COST;
    use axum::http::header;

    fn auth() -> AuthService {
        AuthService::new("0123456789abcdef0123456789abcdef".to_string(), 7, BCRYPT_MIN_COST)
    }

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_missing_cookie_is_empty_session() {
        let session = Session::from_headers(&HeaderMap::new(), &auth());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_committed_session_round_trips() {
        let auth = auth();
        let jar = Session::commit(CookieJar::new(), &auth, &UserId::new("alice")).unwrap();
        let cookie = jar.get(SESSION_COOKIE).unwrap();

        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::days(7)));

        let headers = headers_with_cookie(&format!("{}={}", SESSION_COOKIE, cookie.value()));
        let session = Session::from_headers(&headers, &auth);
        assert_eq!(session.user_id(), Some(&UserId::new("alice")));
    }

    #[test]
    fn test_tampered_cookie_is_empty_session() {
        let auth = auth();
        let token = auth.create_session_token(&UserId::new("alice")).unwrap();
        let tampered = format!("{}x", token);

        let headers = headers_with_cookie(&format!("{}={}", SESSION_COOKIE, tampered));
        assert!(!Session::from_headers(&headers, &auth).is_authenticated());
    }
}
