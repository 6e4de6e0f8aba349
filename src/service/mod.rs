//! gRPC service implementations for the catalog and login endpoints.

/// Public login endpoint.
pub mod auth;

/// Catalog endpoints: create, search, upload, rate.
pub mod catalog;

/// Response-stream plumbing shared by the streaming handlers.
pub mod streaming;

pub use auth::LoginService;
pub use catalog::{CatalogService, MAX_IMAGE_SIZE};
