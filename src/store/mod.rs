//! Concurrency-safe in-memory stores backing the catalog service.
//!
//! Each store owns its entries behind a single lock and only ever hands out
//! independent copies, so callers can never alias store-internal state.

/// Disk-backed image blobs with an in-memory index.
pub mod image;

/// Laptop registry with filtered scan.
pub mod laptop;

/// Per-laptop rating aggregates.
pub mod rating;

/// Seeded user accounts.
pub mod user;

pub use image::{DiskImageStore, ImageInfo};
pub use laptop::LaptopStore;
pub use rating::{Rating, RatingStore};
pub use user::UserStore;
