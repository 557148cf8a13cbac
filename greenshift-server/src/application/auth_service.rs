use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::user::{User, UserRole};
use crate::infrastructure::security::{JwtKeys, hash_password, verify_password};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Clone)]
pub struct AuthService {
    repo: Arc<dyn UserRepository>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(repo: Arc<dyn UserRepository>, keys: JwtKeys) -> Self {
        Self { repo, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::UserNotFound(id))
    }

    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        user_type: &str,
    ) -> Result<(String, User), DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation("name must not be empty".into()));
        }
        let email = email.trim().to_lowercase();
        if !email.contains('@') {
            return Err(DomainError::Validation("invalid email address".into()));
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        let role = UserRole::parse(user_type)?;

        let hash =
            hash_password(password).map_err(|err| DomainError::Internal(err.to_string()))?;
        let user = self
            .repo
            .create(User::new(name.to_string(), email, hash, role))
            .await?;

        let token = self
            .keys
            .generate_token(user.id)
            .map_err(|err| DomainError::Internal(err.to_string()))?;
        Ok((token, user))
    }

    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, User), DomainError> {
        let user = self
            .repo
            .find_by_email(&email.trim().to_lowercase())
            .await?
            .ok_or_else(|| DomainError::Unauthorized("invalid email or password".into()))?;

        let valid = verify_password(password, &user.password_hash)
            .map_err(|_| DomainError::Unauthorized("invalid email or password".into()))?;
        if !valid {
            return Err(DomainError::Unauthorized("invalid email or password".into()));
        }

        let token = self
            .keys
            .generate_token(user.id)
            .map_err(|err| DomainError::Internal(err.to_string()))?;
        Ok((token, user))
    }
}
