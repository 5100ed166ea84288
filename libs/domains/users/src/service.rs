use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use std::sync::{Arc, LazyLock};
use tracing::instrument;

use crate::error::{AuthError, AuthResult};
use crate::models::{NewUser, User};
use crate::repository::UserRepository;

/// Verified against when the username does not exist, so unknown users cost
/// the same hash computation as known ones.
static DUMMY_HASH: LazyLock<String> =
    LazyLock::new(|| hash_password("not-a-real-password").unwrap_or_default());

/// Service layer for credential checks
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Check a username/password pair.
    ///
    /// Unknown user, wrong password and inactive account are indistinguishable
    /// to the caller.
    #[instrument(skip(self, password))]
    pub async fn verify_credentials(&self, username: &str, password: &str) -> AuthResult<User> {
        let Some(user) = self.repository.get_by_username(username).await? else {
            verify_password(password, &DUMMY_HASH);
            tracing::info!("Login failed: unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash) {
            tracing::info!(user_id = user.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }
        if !user.is_active {
            tracing::info!(user_id = user.id, "Login failed: inactive account");
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(user_id = user.id, "Login succeeded");
        Ok(user)
    }

    /// Look up the subject of a renewal token; it must still exist and be active.
    #[instrument(skip(self))]
    pub async fn get_active_user(&self, id: i64) -> AuthResult<User> {
        match self.repository.get_by_id(id).await? {
            Some(user) if user.is_active => Ok(user),
            _ => Err(AuthError::UserUnavailable(id)),
        }
    }

    /// Create `username` with `password` unless it already exists.
    #[instrument(skip(self, password))]
    pub async fn ensure_user(&self, username: &str, password: &str) -> AuthResult<User> {
        if let Some(existing) = self.repository.get_by_username(username).await? {
            tracing::info!(user_id = existing.id, "User already exists");
            return Ok(existing);
        }

        let password_hash = hash_password(password)?;
        self.repository
            .create(NewUser::new(username, password_hash))
            .await
    }
}

pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// A malformed stored hash never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Stored password hash is malformed: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}
