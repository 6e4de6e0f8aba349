use std::collections::HashMap;
use std::sync::Arc;

use tonic::metadata::MetadataMap;
use tonic::Status;

use super::token::{JwtManager, UserClaims};

/// Fully-qualified method names as they appear on the wire.
pub mod methods {
    /// Unary laptop creation.
    pub const CREATE_LAPTOP: &str = "/catalog.LaptopService/CreateLaptop";
    /// Server-streamed filtered search.
    pub const SEARCH_LAPTOP: &str = "/catalog.LaptopService/SearchLaptop";
    /// Client-streamed image upload.
    pub const UPLOAD_IMAGE: &str = "/catalog.LaptopService/UploadImage";
    /// Bidirectional rating stream.
    pub const RATE_LAPTOP: &str = "/catalog.LaptopService/RateLaptop";
}

/// Role-based authorization gate applied before every catalog handler.
///
/// The gate maps fully-qualified method names to the roles allowed to call
/// them; methods absent from the map are public. It holds no store state and
/// is invoked exactly once per call, whatever the call shape — streaming
/// calls are checked at stream establishment, not per message.
pub struct AuthInterceptor {
    jwt_manager: Arc<JwtManager>,
    access_roles: HashMap<String, Vec<String>>,
}

impl AuthInterceptor {
    /// Creates a gate over the given role map.
    pub fn new(jwt_manager: Arc<JwtManager>, access_roles: HashMap<String, Vec<String>>) -> Self {
        Self {
            jwt_manager,
            access_roles,
        }
    }

    /// The default access policy: create and upload are admin-only, rating
    /// is open to admins and users, search stays public.
    pub fn default_access_roles() -> HashMap<String, Vec<String>> {
        HashMap::from([
            (
                methods::CREATE_LAPTOP.to_string(),
                vec!["admin".to_string()],
            ),
            (methods::UPLOAD_IMAGE.to_string(), vec!["admin".to_string()]),
            (
                methods::RATE_LAPTOP.to_string(),
                vec!["admin".to_string(), "user".to_string()],
            ),
        ])
    }

    /// Authorizes one inbound call from its metadata.
    ///
    /// Returns the caller's claims for gated methods, `None` for public
    /// ones. Missing or invalid tokens fail with `Unauthenticated`; a valid
    /// token with an unlisted role fails with `PermissionDenied`.
    #[allow(clippy::result_large_err)]
    pub fn authorize(
        &self,
        method: &str,
        metadata: &MetadataMap,
    ) -> Result<Option<UserClaims>, Status> {
        let Some(access_roles) = self.access_roles.get(method) else {
            // public method
            return Ok(None);
        };

        let value = metadata
            .get("authorization")
            .ok_or_else(|| Status::unauthenticated("authorization token is not provided"))?;

        let access_token = value
            .to_str()
            .map_err(|_| Status::unauthenticated("authorization token is not readable"))?;

        let claims = self
            .jwt_manager
            .verify(access_token)
            .map_err(|e| Status::unauthenticated(format!("access token is invalid: {e}")))?;

        if access_roles.iter().any(|role| role == &claims.role) {
            return Ok(Some(claims));
        }

        Err(Status::permission_denied(format!(
            "permission denied for user: {}",
            claims.username
        )))
    }
}
