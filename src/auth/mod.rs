//! Authentication and authorization: password accounts, signed access
//! tokens, and the per-method authorization gate.

/// Role-based call authorization.
pub mod interceptor;

/// Access token issuing and verification.
pub mod token;

/// Password-bearing user accounts.
pub mod user;

pub use interceptor::{methods, AuthInterceptor};
pub use token::{JwtManager, UserClaims};
pub use user::User;
