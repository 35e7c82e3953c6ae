//! Authentication service - registration, login, tokens and password reset.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::password::DUMMY_PASSWORD_HASH;
use crate::domain::{reset_code, NewUser, Password, PasswordReset, User, UserResponse};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::jobs::{enqueue_best_effort, EmailJob, EmailQueue};

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Bearer token issued on register/login
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Lifetime in seconds
    #[schema(example = 3600)]
    pub expires_in: i64,
}

/// Authenticated user together with a fresh token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: TokenResponse,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account and sign it in
    async fn register(&self, email: String, password: String, name: String)
        -> AppResult<AuthResponse>;

    async fn login(&self, email: String, password: String) -> AppResult<AuthResponse>;

    /// Decode and validate a bearer token
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Issue a reset code and email it to the account owner
    async fn forgot_password(&self, email: String) -> AppResult<()>;

    /// Mark the pending reset as verified if `code` matches and is fresh
    async fn verify_reset_code(&self, email: String, code: String) -> AppResult<()>;

    /// Set a new password once the reset code was verified
    async fn reset_password(&self, email: String, password: String) -> AppResult<()>;
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

/// AuthService over a Unit of Work and the email queue.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    emails: Arc<dyn EmailQueue>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, emails: Arc<dyn EmailQueue>, config: Config) -> Self {
        Self {
            uow,
            emails,
            config,
        }
    }

    fn signed_in(&self, user: User) -> AppResult<AuthResponse> {
        let token = generate_token(&user, &self.config)?;
        Ok(AuthResponse {
            user: UserResponse::from(user),
            token,
        })
    }

    async fn user_by_email(&self, email: &str) -> AppResult<User> {
        self.uow
            .users()
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or_not_found("User")
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(
        &self,
        email: String,
        password: String,
        name: String,
    ) -> AppResult<AuthResponse> {
        let email = normalize_email(&email);
        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let password_hash = Password::new(&password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUser {
                email,
                password_hash,
                name: name.trim().to_string(),
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        enqueue_best_effort(self.emails.as_ref(), EmailJob::welcome(&user.email, &user.name))
            .await;

        self.signed_in(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<AuthResponse> {
        let user = self
            .uow
            .users()
            .find_by_email(&normalize_email(&email))
            .await?;

        // Verify against a dummy hash for unknown accounts so timing does
        // not reveal which emails are registered.
        let stored = Password::from_hash(
            user.as_ref()
                .map(|u| u.password_hash.clone())
                .unwrap_or_else(|| DUMMY_PASSWORD_HASH.to_string()),
        );
        let password_valid = stored.verify(&password);

        match user {
            Some(user) if password_valid => self.signed_in(user),
            _ => Err(AppError::InvalidCredentials),
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    async fn forgot_password(&self, email: String) -> AppResult<()> {
        let user = self.user_by_email(&email).await?;

        let issued = reset_code::issue(Utc::now());
        self.uow
            .users()
            .set_password_reset(user.id, issued.state)
            .await?;

        tracing::info!(user_id = %user.id, "Password reset code issued");
        enqueue_best_effort(
            self.emails.as_ref(),
            EmailJob::password_reset(&user.email, &user.name, &issued.code),
        )
        .await;
        Ok(())
    }

    async fn verify_reset_code(&self, email: String, code: String) -> AppResult<()> {
        let user = self.user_by_email(&email).await?;
        reset_code::check(&user.reset, &code, Utc::now())?;

        self.uow
            .users()
            .set_password_reset(
                user.id,
                PasswordReset {
                    verified: true,
                    ..user.reset
                },
            )
            .await
    }

    async fn reset_password(&self, email: String, password: String) -> AppResult<()> {
        let user = self.user_by_email(&email).await?;
        if !user.reset.verified {
            return Err(AppError::bad_request("Reset code not verified"));
        }

        let password_hash = Password::new(&password)?.into_string();
        self.uow
            .users()
            .update_password(user.id, password_hash)
            .await?;

        tracing::info!(user_id = %user.id, "Password reset completed");
        Ok(())
    }
}
