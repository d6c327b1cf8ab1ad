use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::sync::RwLock;

use bcrypt::{hash, verify, DEFAULT_COST};
use tracing::{info, warn};

use crate::error::ApiError;

/// Flat-file credential store: `username:bcrypt-hash` lines, loaded once at
/// startup and appended to on registration.
pub struct UserStore {
    path: PathBuf,
    users: RwLock<HashMap<String, String>>,
}

impl UserStore {
    /// Reads the users file into memory. A missing file is fine; it gets
    /// created on the first registration.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ApiError> {
        let path = path.into();
        let mut users = HashMap::new();
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                for line in contents.lines() {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    match line.split_once(':') {
                        Some((username, hashed)) if !username.is_empty() && !hashed.is_empty() => {
                            users.insert(username.to_string(), hashed.to_string());
                        }
                        _ => warn!(path = %path.display(), "skipping malformed credential line"),
                    }
                }
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        info!(count = users.len(), path = %path.display(), "loaded user credentials");
        Ok(Self {
            path,
            users: RwLock::new(users),
        })
    }

    /// Hashes the password and appends the new user to the file and the map.
    /// Fails with `UserExists` if the username is taken.
    pub fn register(&self, username: &str, password: &str) -> Result<(), ApiError> {
        {
            let users = self.users.read().map_err(|_| ApiError::Poisoned)?;
            if users.contains_key(username) {
                return Err(ApiError::UserExists);
            }
        }

        // Hash outside the lock; bcrypt is deliberately slow.
        let hashed = hash(password, DEFAULT_COST)?;

        let mut users = self.users.write().map_err(|_| ApiError::Poisoned)?;
        if users.contains_key(username) {
            return Err(ApiError::UserExists);
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}:{}", username, hashed)?;
        users.insert(username.to_string(), hashed);
        Ok(())
    }

    /// Checks a password against the stored hash. Unknown usernames and hash
    /// mismatches fail with the same error.
    pub fn verify(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let users = self.users.read().map_err(|_| ApiError::Poisoned)?;
        let stored = users.get(username).ok_or(ApiError::InvalidCredentials)?;
        if verify(password, stored).unwrap_or(false) {
            Ok(())
        } else {
            Err(ApiError::InvalidCredentials)
        }
    }
}
