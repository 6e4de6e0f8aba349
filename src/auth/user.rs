use crate::Result;

/// A user account with a salted password hash.
///
/// Records are seeded at startup and never edited in place; `Clone` exists
/// for safe hand-off between the store and callers.
#[derive(Clone, Debug)]
pub struct User {
    /// Login name, unique within the user store.
    pub username: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
    /// Role used by the authorization gate.
    pub role: String,
}

impl User {
    /// Creates a user, hashing the password with bcrypt.
    pub fn new(username: &str, password: &str, role: &str) -> Result<Self> {
        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)?;

        Ok(Self {
            username: username.to_string(),
            password_hash,
            role: role.to_string(),
        })
    }

    /// Checks a candidate password against the stored hash.
    pub fn is_correct_password(&self, password: &str) -> bool {
        bcrypt::verify(password, &self.password_hash).unwrap_or(false)
    }
}
