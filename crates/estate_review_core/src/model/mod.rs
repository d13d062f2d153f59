//! Domain model for the duplicate-review workflow.
//!
//! # Responsibility
//! - Define the normalized record shapes the services operate on.
//! - Keep one shape per concept; wire-format variations are resolved in `api::wire`.
//!
//! # Invariants
//! - Record summaries are read-only on the client; only ids flow back to the backend.
//! - A duplicate group always carries its members in backend order.

pub mod building;
pub mod console_query;
pub mod group;
pub mod notice;
pub mod property;
pub mod task;
