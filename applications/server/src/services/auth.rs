/// Authentication service - session tokens and password handling
use crate::error::{Result, ServerError};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shelf_core::{NewUser, ShelfError, User, UserField, UserId, UserStore, ValidationErrors};
use thiserror::Error;

/// Minimum signup password length, in characters
pub const PASSWORD_MIN_LEN: usize = 8;

#[derive(Debug, Clone)]
pub struct AuthService {
    secret: String,
    session_days: u64,
    bcrypt_cost: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
}

/// Why a login attempt failed
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Please provide a username and password")]
    MissingCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid password")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] ShelfError),

    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Why a signup attempt failed
#[derive(Debug, Error)]
pub enum SignupError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("The entered passwords are not equal")]
    PasswordMismatch,

    #[error("Password must be at least 8 characters")]
    PasswordTooShort,

    #[error("{}", first_message(.0))]
    InvalidUser(ValidationErrors<UserField>),

    #[error("Username {0} is already taken")]
    UsernameTaken(String),

    #[error(transparent)]
    Store(ShelfError),

    #[error(transparent)]
    Server(#[from] ServerError),
}

fn first_message(errors: &ValidationErrors<UserField>) -> String {
    errors
        .iter()
        .next()
        .map(|(_, e)| e.message.clone())
        .unwrap_or_default()
}

impl AuthService {
    pub fn new(secret: String, session_days: u64, bcrypt_cost: u32) -> Self {
        Self {
            secret,
            session_days,
            bcrypt_cost,
        }
    }

    /// How long a session stays valid
    pub fn session_duration(&self) -> Duration {
        Duration::days(self.session_days as i64)
    }

    /// Hash a password using bcrypt
    pub fn hash_password(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, self.bcrypt_cost).map_err(ServerError::from)
    }

    /// Verify a password against a hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(password, hash).map_err(ServerError::from)
    }

    /// Create a signed session token for `user_id`
    pub fn create_session_token(&self, user_id: &UserId) -> Result<String> {
        let now = Utc::now();
        let exp = now + self.session_duration();

        let claims = Claims {
            sub: user_id.as_str().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &encoding_key).map_err(ServerError::from)
    }

    /// Verify a session token's signature and expiry
    pub fn verify_session_token(&self, token: &str) -> Result<UserId> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let validation = Validation::default();

        let token_data = decode::<Claims>(token, &decoding_key, &validation)?;
        Ok(UserId::new(token_data.claims.sub))
    }

    /// Check a username and password against the store
    pub async fn authenticate<S: UserStore + ?Sized>(
        &self,
        store: &S,
        username: &str,
        password: &str,
    ) -> std::result::Result<User, AuthError> {
        if username.is_empty() || password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let credentials = store
            .find_credentials(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !self.verify_password(password, &credentials.password_hash)? {
            tracing::debug!("Wrong password for {}", username);
            return Err(AuthError::InvalidCredentials);
        }

        Ok(credentials.user)
    }

    /// Create an account
    ///
    /// Inputs are trimmed. The form checks run before the store is touched.
    pub async fn register<S: UserStore + ?Sized>(
        &self,
        store: &S,
        username: &str,
        password: &str,
        repeat_password: &str,
    ) -> std::result::Result<User, SignupError> {
        let username = username.trim();
        let password = password.trim();
        let repeat_password = repeat_password.trim();

        if username.is_empty() || password.is_empty() || repeat_password.is_empty() {
            return Err(SignupError::MissingFields);
        }

        if password != repeat_password {
            return Err(SignupError::PasswordMismatch);
        }

        if password.chars().count() < PASSWORD_MIN_LEN {
            return Err(SignupError::PasswordTooShort);
        }

        NewUser::validate_username(username).map_err(SignupError::InvalidUser)?;

        let password_hash = self.hash_password(password)?;

        let user = store
            .create_user(NewUser::new(username, password_hash))
            .await
            .map_err(|e| match e {
                ShelfError::Duplicate(_) => SignupError::UsernameTaken(username.to_string()),
                ShelfError::UserInvalid(errors) => SignupError::InvalidUser(errors),
                other => SignupError::Store(other),
            })?;

        tracing::info!("Created user {}", user.id);
        Ok(user)
    }
}
