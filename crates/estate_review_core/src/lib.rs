//! Core of the estate admin console's duplicate-review workflow.
//! Holds the review state machine and the typed backend client it drives.

pub mod api;
pub mod config;
pub mod logging;
pub mod model;
pub mod service;

pub use api::admin_api::{AdminApi, ApiError, ApiResult};
pub use api::http_api::HttpAdminApi;
pub use config::{ApiConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingError};
pub use model::building::{
    BuildingCandidate, BuildingId, BuildingMergeHistoryEntry, BuildingMergeHistoryPage,
    BuildingMergeResult, BuildingSearchQuery, HistoryQuery, MergeHistoryId, RevertResult,
    Suggestion,
};
pub use model::console_query::{ConsoleQuery, ConsoleTab};
pub use model::group::{
    DuplicateGroup, DuplicateGroupPage, GroupId, GroupQuery, GroupQueryError, PropertyId,
    RecordSummary,
};
pub use model::notice::{Notice, NoticeLevel};
pub use model::property::{ExclusionRecord, Listing, PropertyDetail, PropertyMergeResult};
pub use model::task::{TaskSnapshot, TaskStatus};
pub use service::building_merge_service::{
    BuildingMergeDraft, BuildingMergeError, BuildingMergeService,
};
pub use service::duplicate_review_service::{
    CommitFailure, CommitReport, DuplicateReviewService, ReviewError,
};
pub use service::retry::{PollOutcome, RetryPolicy, Sleeper, ThreadSleeper};
pub use service::review_session::{
    ExclusionKind, ExclusionPlan, MergePlan, ReviewSession, SessionError,
};
pub use service::selection::SelectionState;
pub use service::task_control_service::{
    TaskControlError, TaskControlOutcome, TaskControlService,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
