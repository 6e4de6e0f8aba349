use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::User;
use crate::{Error, Result};

/// In-memory user registry, seeded once at startup.
pub struct UserStore {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl UserStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Saves a copy of the user, keyed by username.
    ///
    /// Returns [`Error::AlreadyExists`] if the username is taken.
    pub async fn save(&self, user: &User) -> Result<()> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.username) {
            return Err(Error::AlreadyExists);
        }

        users.insert(user.username.clone(), user.clone());
        Ok(())
    }

    /// Finds a user by username, returning an independent copy.
    pub async fn find(&self, username: &str) -> Option<User> {
        let users = self.users.read().await;
        users.get(username).cloned()
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for UserStore {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str, role: &str) -> User {
        User {
            username: username.to_string(),
            password_hash: String::new(),
            role: role.to_string(),
        }
    }

    #[tokio::test]
    async fn save_and_find_round_trip() {
        let store = UserStore::new();
        store.save(&user("admin", "admin")).await.unwrap();

        let found = store.find("admin").await.unwrap();
        assert_eq!(found.role, "admin");
        assert!(store.find("nobody").await.is_none());
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = UserStore::new();
        store.save(&user("admin", "admin")).await.unwrap();

        let result = store.save(&user("admin", "user")).await;
        assert!(matches!(result, Err(Error::AlreadyExists)));

        // original record must be intact
        assert_eq!(store.find("admin").await.unwrap().role, "admin");
    }
}
