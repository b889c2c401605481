//! services/api/src/adapters/users.rs
//!
//! In-memory implementation of the `CredentialStore` port, plus the default
//! password verifier. Registered users live for the lifetime of the process;
//! there is deliberately no persistence.

use async_trait::async_trait;
use book_reviews_core::domain::User;
use book_reviews_core::ports::{CredentialStore, CredentialVerifier, PortError, PortResult};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

//=========================================================================================
// Password Verification
//=========================================================================================

/// Byte-for-byte password comparison.
///
/// This matches the original service's contract exactly. Swapping in a
/// hash-based `CredentialVerifier` changes nothing else in the system.
pub struct PlainTextVerifier;

impl CredentialVerifier for PlainTextVerifier {
    fn verify(&self, presented: &str, stored: &str) -> bool {
        presented == stored
    }
}

//=========================================================================================
// The Credential Store Adapter
//=========================================================================================

/// A credential store backed by a lock-guarded map of username -> password.
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<String, String>>,
    verifier: Arc<dyn CredentialVerifier>,
}

impl InMemoryCredentialStore {
    pub fn new(verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            verifier,
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn register(&self, username: &str, password: &str) -> PortResult<User> {
        if username.is_empty() || password.is_empty() {
            return Err(PortError::InvalidInput(
                "Username and password are required".to_string(),
            ));
        }

        // The write guard covers the existence check and the insert, so two
        // racing registrations for the same name cannot both succeed.
        let mut users = self
            .users
            .write()
            .map_err(|_| PortError::Unexpected("user store lock poisoned".to_string()))?;
        if users.contains_key(username) {
            return Err(PortError::Conflict(username.to_string()));
        }
        users.insert(username.to_string(), password.to_string());

        Ok(User {
            username: username.to_string(),
        })
    }

    async fn validate(&self, username: &str, password: &str) -> PortResult<User> {
        let users = self
            .users
            .read()
            .map_err(|_| PortError::Unexpected("user store lock poisoned".to_string()))?;

        let stored = users.get(username).ok_or(PortError::Unauthenticated)?;
        if !self.verifier.verify(password, stored) {
            return Err(PortError::Unauthenticated);
        }

        Ok(User {
            username: username.to_string(),
        })
    }
}

//=========================================================================================
// Tests
//=========================================================================================
