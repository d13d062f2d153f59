//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate backend calls into operator-level actions.
//! - Keep dialog state in explicit session objects instead of shared globals.

pub mod building_merge_service;
pub mod duplicate_review_service;
pub mod retry;
pub mod review_session;
pub mod selection;
pub mod task_control_service;
