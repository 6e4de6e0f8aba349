use std::sync::Arc;

use tonic::{Request, Response, Status};
use tracing::info;

use crate::auth::JwtManager;
use crate::proto::auth_service_server::AuthService;
use crate::proto::{LoginRequest, LoginResponse};
use crate::store::UserStore;

/// Public login endpoint exchanging credentials for an access token.
///
/// This service carries no entry in the authorization gate's role map, so it
/// is reachable without a token.
pub struct LoginService {
    user_store: UserStore,
    jwt_manager: Arc<JwtManager>,
}

impl LoginService {
    /// Creates the service over the user store and token manager.
    pub fn new(user_store: UserStore, jwt_manager: Arc<JwtManager>) -> Self {
        Self {
            user_store,
            jwt_manager,
        }
    }
}

#[tonic::async_trait]
impl AuthService for LoginService {
    async fn login(
        &self,
        request: Request<LoginRequest>,
    ) -> Result<Response<LoginResponse>, Status> {
        let req = request.into_inner();

        // a single status for both misses, so the response does not reveal
        // which of the two was wrong
        let user = match self.user_store.find(&req.username).await {
            Some(user) if user.is_correct_password(&req.password) => user,
            _ => return Err(Status::not_found("incorrect username or password")),
        };

        let access_token = self
            .jwt_manager
            .generate(&user)
            .map_err(|e| Status::internal(format!("cannot generate access token: {e}")))?;

        info!(username = %user.username, "user logged in");
        Ok(Response::new(LoginResponse { access_token }))
    }
}
