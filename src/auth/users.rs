//! In-memory credential store used by the login and registration routes.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;

/// Cost bounds bcrypt accepts for `hash`.
pub const MIN_PASSWORD_COST: u32 = 4;
pub const MAX_PASSWORD_COST: u32 = 31;

/// A registered user. The plaintext password is never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub login: String,
    pub password_hash: String,
}

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User already exists")]
    AlreadyExists,

    #[error("User not found")]
    NotFound,

    #[error("Wrong password")]
    WrongPassword,

    #[error("password hashing failed: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    #[error("password hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone)]
pub struct UserStore {
    users: Arc<RwLock<HashMap<String, Credential>>>,
    cost: u32,
}

impl UserStore {
    pub fn new(cost: u32) -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            cost,
        }
    }

    pub async fn register(&self, login: &str, password: &str) -> Result<Credential, UserError> {
        if self.users.read().await.contains_key(login) {
            return Err(UserError::AlreadyExists);
        }

        let password_hash = hash_password(password.to_string(), self.cost).await?;
        let credential = Credential {
            login: login.to_string(),
            password_hash,
        };

        // Re-check under the write lock: another registration may have won while hashing.
        let mut users = self.users.write().await;
        if users.contains_key(login) {
            return Err(UserError::AlreadyExists);
        }
        users.insert(login.to_string(), credential.clone());
        tracing::info!(login = %login, "User registered");

        Ok(credential)
    }

    pub async fn verify(&self, login: &str, password: &str) -> Result<Credential, UserError> {
        let credential = self
            .users
            .read()
            .await
            .get(login)
            .cloned()
            .ok_or(UserError::NotFound)?;

        let hash = credential.password_hash.clone();
        let password = password.to_string();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;

        if matches {
            Ok(credential)
        } else {
            Err(UserError::WrongPassword)
        }
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

async fn hash_password(password: String, cost: u32) -> Result<String, UserError> {
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
    Ok(hash)
}
