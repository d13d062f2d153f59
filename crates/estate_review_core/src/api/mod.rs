//! Backend contract and transport implementations.
//!
//! # Responsibility
//! - Define the admin backend operations the review workflow depends on.
//! - Normalize wire shapes into `model` types at the boundary.
//!
//! # Invariants
//! - Callers above this layer never see raw JSON or HTTP status codes, only
//!   `ApiError` variants.

pub mod admin_api;
pub mod http_api;
pub mod wire;
