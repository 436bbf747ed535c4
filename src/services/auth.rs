//! Admin authentication service

use std::collections::HashMap;
use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::admin::{AdminAccount, LoginRequest, LoginResponse, NewAdminAccount, SessionClaims, SessionInfo},
    repository::Repository,
};

use super::availability::AvailabilityService;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
    availability: AvailabilityService,
    /// Signed-out session ids, kept until their token would have expired
    revoked: Arc<Mutex<HashMap<Uuid, i64>>>,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig, availability: AvailabilityService) -> Self {
        Self {
            repository,
            config,
            availability,
            revoked: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Authenticate by email and password and open a session
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        request.validate()?;
        let email = request.email.trim().to_lowercase();

        let account = self
            .repository
            .admins
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Authentication(INVALID_CREDENTIALS.to_string()))?;

        if !verify_password(&account, &request.password)? {
            tracing::warn!("Failed sign-in for {}", email);
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        let now = Utc::now().timestamp();
        let expires_in = self.config.jwt_expiration_hours as i64 * 3600;
        let claims = SessionClaims {
            sub: account.id,
            email: account.email.clone(),
            jti: Uuid::new_v4(),
            exp: now + expires_in,
            iat: now,
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        tracing::info!("Admin {} signed in", account.email);

        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in,
            session: SessionInfo {
                user_id: account.id,
                email: account.email,
                is_admin: account.is_admin,
            },
        })
    }

    /// Claims of a valid, not signed-out token
    pub async fn session(&self, token: &str) -> AppResult<SessionClaims> {
        let claims = SessionClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|_| AppError::Authentication("Invalid or expired session".to_string()))?;

        if self.revoked.lock().await.contains_key(&claims.jti) {
            return Err(AppError::Authentication("Session has been signed out".to_string()));
        }
        Ok(claims)
    }

    pub async fn is_admin(&self, user_id: Uuid) -> AppResult<bool> {
        Ok(self
            .repository
            .admins
            .get(user_id)
            .await?
            .map(|a| a.is_admin)
            .unwrap_or(false))
    }

    pub async fn session_info(&self, claims: &SessionClaims) -> AppResult<SessionInfo> {
        Ok(SessionInfo {
            user_id: claims.sub,
            email: claims.email.clone(),
            is_admin: self.is_admin(claims.sub).await?,
        })
    }

    /// Revoke the session and drop its availability draft
    pub async fn sign_out(&self, claims: &SessionClaims) {
        let now = Utc::now().timestamp();
        {
            let mut revoked = self.revoked.lock().await;
            revoked.retain(|_, exp| *exp > now);
            revoked.insert(claims.jti, claims.exp);
        }
        self.availability.drop_session(claims.jti).await;
        tracing::info!("Admin {} signed out", claims.email);
    }

    /// Create the configured admin account when it does not exist yet
    pub async fn ensure_admin(&self) -> AppResult<Option<AdminAccount>> {
        let (Some(email), Some(password)) = (
            self.config.bootstrap_admin_email.as_deref(),
            self.config.bootstrap_admin_password.as_deref(),
        ) else {
            return Ok(None);
        };

        let email = email.trim().to_lowercase();
        if self.repository.admins.find_by_email(&email).await?.is_some() {
            return Ok(None);
        }

        let account = self
            .repository
            .admins
            .create(&NewAdminAccount {
                email,
                password_hash: hash_password(password)?,
                is_admin: true,
            })
            .await?;
        tracing::info!("Created admin account {}", account.email);
        Ok(Some(account))
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

fn verify_password(account: &AdminAccount, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(&account.password_hash)
        .map_err(|e| AppError::Internal(format!("Invalid password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
