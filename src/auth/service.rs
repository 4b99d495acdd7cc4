// Authentication service - business logic layer

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::{models::User, password::PasswordService, token::TokenService};
use crate::error::ApiError;
use crate::storage::{with_timeout, DynStorage};

/// Authentication service coordinating registration and login
#[derive(Clone)]
pub struct AuthService {
    storage: DynStorage,
    token_service: Arc<TokenService>,
    storage_timeout: Duration,
}

impl AuthService {
    pub fn new(storage: DynStorage, token_service: Arc<TokenService>, storage_timeout: Duration) -> Self {
        Self {
            storage,
            token_service,
            storage_timeout,
        }
    }

    /// Register a new user
    ///
    /// Stores only the credential digest. A taken email surfaces as
    /// `UserAlreadyExists`, straight from the storage adapter.
    pub async fn register(&self, email: &str, password: &str) -> Result<(), ApiError> {
        info!("Registering user: {}", email);

        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            enc_password: PasswordService::hash_password(password),
        };

        with_timeout(self.storage_timeout, "create user", self.storage.create_user(&user)).await?;

        debug!("Registered user {} with id {}", user.email, user.id);
        Ok(())
    }

    /// Login a user and return a signed access token
    ///
    /// Unknown email and wrong password both answer `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        info!("Logging in user: {}", email);

        let user = match with_timeout(
            self.storage_timeout,
            "get user by email",
            self.storage.get_user_by_email(email),
        )
        .await
        {
            Ok(user) => user,
            Err(ApiError::UserNotFound(message)) => {
                debug!("Login rejected: {}", message);
                return Err(ApiError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        if !PasswordService::verify_password(password, &user.enc_password) {
            debug!("Login rejected: password mismatch for {}", email);
            return Err(ApiError::InvalidCredentials);
        }

        let (token, expires_at) = self
            .token_service
            .issue(&user.id.to_string(), &user.email)
            .map_err(|e| ApiError::internal(format!("failed to generate token: {}", e)))?;

        debug!("Issued token for {} valid until {}", user.email, expires_at);
        Ok(token)
    }
}
