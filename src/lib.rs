//! gRPC laptop catalog service.
//!
//! Clients create, search, rate, and attach images to laptop entries. Every
//! catalog call passes through a role-based authorization gate backed by
//! signed access tokens; the public login endpoint issues those tokens.
//!
//! The crate splits into:
//! - [`store`]: concurrency-safe in-memory stores (laptops, ratings, images, users)
//! - [`auth`]: password verification, token management, and the authorization gate
//! - [`service`]: the gRPC handlers for both services
//! - [`client`]: typed client wrappers for all of the RPCs
//! - [`sample`] and [`serializer`]: sample-data generation and protobuf file helpers

/// Password accounts, access tokens, and the authorization gate.
pub mod auth;
/// Typed client wrappers for the catalog and auth services.
pub mod client;
/// Crate-wide error types.
pub mod error;
/// Generated protobuf and gRPC types for the `catalog` wire schema.
pub mod proto;
/// Random sample data for demos and tests.
pub mod sample;
/// Protobuf file helpers.
pub mod serializer;
/// gRPC service implementations.
pub mod service;
/// Concurrency-safe in-memory stores.
pub mod store;

pub use error::{Error, Result};
