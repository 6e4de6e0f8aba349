use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::user::User;
use crate::Result;

/// Claims embedded in a signed access token.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserClaims {
    /// Expiry, seconds since the UNIX epoch.
    pub exp: u64,
    /// Login name of the token holder.
    pub username: String,
    /// Role granted to the token holder.
    pub role: String,
}

/// Issues and verifies signed, time-limited access tokens.
///
/// Tokens are HS256-signed with a shared secret. Verification pins the
/// algorithm family: a token whose header names any other algorithm is
/// rejected outright, so a forged header cannot downgrade the check.
pub struct JwtManager {
    secret_key: String,
    token_duration: Duration,
}

impl JwtManager {
    /// Creates a manager signing with `secret_key`, issuing tokens valid for
    /// `token_duration`.
    pub fn new(secret_key: impl Into<String>, token_duration: Duration) -> Self {
        Self {
            secret_key: secret_key.into(),
            token_duration,
        }
    }

    /// Generates a signed token carrying the user's name and role.
    pub fn generate(&self, user: &User) -> Result<String> {
        let expires_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_else(|_| unreachable!("System time is after UNIX_EPOCH"))
            + self.token_duration;

        let claims = UserClaims {
            exp: expires_at.as_secs(),
            username: user.username.clone(),
            role: user.role.clone(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret_key.as_bytes()),
        )?;

        Ok(token)
    }

    /// Verifies a token and returns its claims.
    ///
    /// Fails if the signature does not verify under HS256, if the header
    /// names a different algorithm, or if the expiry has passed. Expiry is
    /// checked with zero leeway.
    pub fn verify(&self, access_token: &str) -> Result<UserClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<UserClaims>(
            access_token,
            &DecodingKey::from_secret(self.secret_key.as_bytes()),
            &validation,
        )?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> User {
        User {
            username: "admin".to_string(),
            password_hash: String::new(),
            role: "admin".to_string(),
        }
    }

    #[test]
    fn generate_then_verify_round_trip() {
        let manager = JwtManager::new("secret", Duration::from_secs(60));

        let token = manager.generate(&admin()).unwrap();
        let claims = manager.verify(&token).unwrap();

        assert_eq!(claims.username, "admin");
        assert_eq!(claims.role, "admin");
    }

    #[test]
    fn expired_token_is_rejected() {
        let manager = JwtManager::new("secret", Duration::ZERO);

        let token = manager.generate(&admin()).unwrap();
        std::thread::sleep(Duration::from_millis(1100));

        assert!(manager.verify(&token).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let manager = JwtManager::new("secret", Duration::from_secs(60));
        let token = manager.generate(&admin()).unwrap();

        let other = JwtManager::new("other-secret", Duration::from_secs(60));
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn foreign_signing_algorithm_is_rejected() {
        let manager = JwtManager::new("secret", Duration::from_secs(60));

        let expires_at = SystemTime::now().duration_since(UNIX_EPOCH).unwrap()
            + Duration::from_secs(60);
        let claims = UserClaims {
            exp: expires_at.as_secs(),
            username: "admin".to_string(),
            role: "admin".to_string(),
        };
        // same secret, different algorithm family member
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(manager.verify(&token).is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let manager = JwtManager::new("secret", Duration::from_secs(60));
        let token = manager.generate(&admin()).unwrap();

        let mut tampered = token.clone();
        tampered.pop();

        assert!(manager.verify(&tampered).is_err());
    }
}
