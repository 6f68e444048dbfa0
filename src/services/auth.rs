use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    db::{SessionStore, Store},
    error::{AppError, AppResult},
    models::{NewUser, User, UserPreferences},
};

pub const MIN_PASSWORD_LEN: usize = 4;
pub const READING_SPEED_RANGE: std::ops::RangeInclusive<i32> = 1..=5;
pub const DAILY_TIME_RANGE: std::ops::RangeInclusive<i32> = 15..=180;

const BAD_CREDENTIALS: &str = "Invalid username or password";

/// Hash a password with Argon2id and a random salt, returning a PHC string
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a stored PHC hash
pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash format: {}", e)))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(_) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::Internal(format!(
            "Password verification failed: {}",
            e
        ))),
    }
}

/// Check reading preferences against the accepted ranges
pub fn validate_preferences(prefs: &UserPreferences) -> AppResult<()> {
    if !READING_SPEED_RANGE.contains(&prefs.reading_speed) {
        return Err(AppError::InvalidInput(format!(
            "reading_speed must be between {} and {} pages per minute",
            READING_SPEED_RANGE.start(),
            READING_SPEED_RANGE.end()
        )));
    }
    if !DAILY_TIME_RANGE.contains(&prefs.daily_reading_time) {
        return Err(AppError::InvalidInput(format!(
            "daily_reading_time must be between {} and {} minutes",
            DAILY_TIME_RANGE.start(),
            DAILY_TIME_RANGE.end()
        )));
    }
    if prefs.page_range.min < 0 || prefs.page_range.min > prefs.page_range.max {
        return Err(AppError::InvalidInput(
            "page_range must satisfy 0 <= min <= max".to_string(),
        ));
    }
    if prefs.preferred_language.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "preferred_language must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Registration input
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub preferences: UserPreferences,
}

impl Registration {
    fn validate(&self) -> AppResult<()> {
        if self.username.trim().is_empty() {
            return Err(AppError::InvalidInput("username is required".to_string()));
        }
        if self.email.trim().is_empty() {
            return Err(AppError::InvalidInput("email is required".to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::InvalidInput(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        validate_preferences(&self.preferences)
    }
}

/// A signed-in user and the bearer token for the session
#[derive(Debug, Clone, serde::Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

/// Create an account and sign it in
pub async fn register(
    store: &dyn Store,
    sessions: &dyn SessionStore,
    registration: Registration,
) -> AppResult<AuthSession> {
    registration.validate()?;

    let new_user = NewUser {
        username: registration.username.trim().to_string(),
        email: registration.email.trim().to_string(),
        password_hash: hash_password(&registration.password)?,
        preferences: registration.preferences,
    };
    let user = store.create_user(new_user).await?;
    let token = sessions.create(user.id).await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok(AuthSession { token, user })
}

/// Check credentials and open a session
pub async fn login(
    store: &dyn Store,
    sessions: &dyn SessionStore,
    username: &str,
    password: &str,
) -> AppResult<AuthSession> {
    let credentials = store
        .find_credentials(username.trim())
        .await?
        .ok_or_else(|| AppError::Unauthorized(BAD_CREDENTIALS.to_string()))?;

    if !verify_password(password, &credentials.password_hash)? {
        tracing::warn!(username = %username, "Failed login attempt");
        return Err(AppError::Unauthorized(BAD_CREDENTIALS.to_string()));
    }

    let token = sessions.create(credentials.user.id).await?;
    tracing::info!(user_id = credentials.user.id, "User logged in");

    Ok(AuthSession {
        token,
        user: credentials.user,
    })
}

/// Replace a user's reading preferences
pub async fn update_preferences(
    store: &dyn Store,
    user_id: i64,
    preferences: UserPreferences,
) -> AppResult<User> {
    validate_preferences(&preferences)?;
    store.update_preferences(user_id, &preferences).await
}
