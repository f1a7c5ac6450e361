//! Authentication service: password hashing, JWT, registration and login.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::user::{AuthResponse, LoginRequest, NewUser, RegisterRequest, Role, User};
use crate::store::UserStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims embedded in access and refresh tokens.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// User row id.
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub token_type: TokenType,
    pub exp: i64,
    pub iat: i64,
}

/// Hash a plaintext password with argon2id.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {e}")))
}

/// Verify a plaintext password against a stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Issue an access + refresh token pair wrapped with the user profile.
pub fn issue_tokens(
    user: User,
    jwt_secret: &str,
    access_expiry_secs: i64,
    refresh_expiry_secs: i64,
) -> Result<AuthResponse, AppError> {
    let now = Utc::now();
    let encoding_key = EncodingKey::from_secret(jwt_secret.as_bytes());

    let claims = |token_type, expiry_secs| Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        role: user.role,
        token_type,
        exp: (now + Duration::seconds(expiry_secs)).timestamp(),
        iat: now.timestamp(),
    };

    let access_token = jsonwebtoken::encode(
        &Header::default(),
        &claims(TokenType::Access, access_expiry_secs),
        &encoding_key,
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {e}")))?;

    let refresh_token = jsonwebtoken::encode(
        &Header::default(),
        &claims(TokenType::Refresh, refresh_expiry_secs),
        &encoding_key,
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {e}")))?;

    Ok(AuthResponse {
        access_token,
        refresh_token,
        token_type: "Bearer".to_string(),
        expires_in: access_expiry_secs,
        user: user.into(),
    })
}

/// Validate a JWT and return the claims.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_secret(jwt_secret.as_bytes());
    let validation = Validation::default();

    jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized)
}

fn issue_for(user: User, config: &AppConfig) -> Result<AuthResponse, AppError> {
    issue_tokens(
        user,
        &config.jwt_secret,
        config.jwt_access_token_expiry_secs,
        config.jwt_refresh_token_expiry_secs,
    )
}

/// Create a `user`-role account and sign it in.
pub async fn register(
    store: &dyn UserStore,
    input: &RegisterRequest,
    config: &AppConfig,
) -> Result<AuthResponse, AppError> {
    input.validate()?;

    let new_user = NewUser {
        email: input.email.trim().to_lowercase(),
        name: input.name.clone(),
        password_hash: hash_password(&input.password)?,
        role: Role::User,
    };
    let user = store.insert(&new_user).await?;
    tracing::info!(user_id = user.id, "User registered");

    issue_for(user, config)
}

/// Authenticate a user by email and password.
pub async fn login(
    store: &dyn UserStore,
    input: &LoginRequest,
    config: &AppConfig,
) -> Result<AuthResponse, AppError> {
    input.validate()?;

    let user = store
        .find_by_email(&input.email.trim().to_lowercase())
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&input.password, &user.password_hash)? {
        tracing::warn!(user_id = user.id, "Failed login attempt");
        return Err(AppError::Unauthorized);
    }

    issue_for(user, config)
}

/// Exchange a valid refresh token for a fresh token pair.
pub async fn refresh(
    store: &dyn UserStore,
    refresh_token: &str,
    config: &AppConfig,
) -> Result<AuthResponse, AppError> {
    let claims = validate_token(refresh_token, &config.jwt_secret)?;

    if claims.token_type != TokenType::Refresh {
        return Err(AppError::Unauthorized);
    }

    let user_id: i64 = claims.sub.parse().map_err(|_| AppError::Unauthorized)?;
    let user = store
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    issue_for(user, config)
}

/// Find a user by ID.
pub async fn find_user_by_id(store: &dyn UserStore, id: i64) -> Result<User, AppError> {
    store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}
