use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::error::ApiError;

/// In-memory session map: random hex token -> username. Sessions never
/// expire; they live until logout or process exit.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a fresh 16-byte token (32 hex chars) for the given user.
    pub fn create(&self, username: &str) -> Result<String, ApiError> {
        let token = Uuid::new_v4().simple().to_string();
        self.sessions
            .write()
            .map_err(|_| ApiError::Poisoned)?
            .insert(token.clone(), username.to_string());
        Ok(token)
    }

    pub fn resolve(&self, token: &str) -> Result<String, ApiError> {
        self.sessions
            .read()
            .map_err(|_| ApiError::Poisoned)?
            .get(token)
            .cloned()
            .ok_or(ApiError::InvalidSession)
    }

    /// Removes the session. Destroying an unknown token is a no-op.
    pub fn destroy(&self, token: &str) -> Result<(), ApiError> {
        self.sessions
            .write()
            .map_err(|_| ApiError::Poisoned)?
            .remove(token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_resolve_destroy() {
        let store = SessionStore::new();
        let token = store.create("alice").unwrap();

        assert_eq!(token.len(), 32);
        assert_eq!(store.resolve(&token).unwrap(), "alice");

        store.destroy(&token).unwrap();
        assert!(matches!(
            store.resolve(&token),
            Err(ApiError::InvalidSession)
        ));
    }

    #[test]
    fn destroy_is_idempotent() {
        let store = SessionStore::new();
        let token = store.create("bob").unwrap();
        store.destroy(&token).unwrap();
        store.destroy(&token).unwrap();
    }

    #[test]
    fn tokens_are_unique_per_login() {
        let store = SessionStore::new();
        let a = store.create("carol").unwrap();
        let b = store.create("carol").unwrap();
        assert_ne!(a, b);
        assert_eq!(store.resolve(&a).unwrap(), "carol");
        assert_eq!(store.resolve(&b).unwrap(), "carol");
    }

    #[test]
    fn unknown_token_is_unauthorized() {
        let store = SessionStore::new();
        assert!(matches!(
            store.resolve("deadbeef"),
            Err(ApiError::InvalidSession)
        ));
    }
}
