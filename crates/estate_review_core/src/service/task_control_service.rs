//! Scraping task pause/resume control.
//!
//! # Responsibility
//! - Issue pause/resume requests and wait for the backend to confirm them.
//!
//! # Invariants
//! - Requests take `&mut self`; one request per service runs at a time.
//! - Polling is bounded by the configured `RetryPolicy`.

use crate::api::admin_api::{AdminApi, ApiError};
use crate::model::notice::Notice;
use crate::model::task::{TaskSnapshot, TaskStatus};
use crate::service::retry::{PollOutcome, RetryPolicy, Sleeper, ThreadSleeper};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from task control operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskControlError {
    InvalidTaskId,
    Api(ApiError),
}

impl TaskControlError {
    pub fn to_notice(&self, action: &str) -> Notice {
        match self {
            Self::Api(err) => Notice::from_api_error(action, err),
            other => Notice::error(other.to_string()),
        }
    }
}

impl Display for TaskControlError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTaskId => write!(f, "task id must be a non-blank path segment"),
            Self::Api(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskControlError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ApiError> for TaskControlError {
    fn from(value: ApiError) -> Self {
        Self::Api(value)
    }
}

/// Result of a pause/resume request after polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskControlOutcome {
    /// Backend reports the requested state.
    Confirmed(TaskSnapshot),
    /// State did not flip within the retry budget; a manual refresh is needed.
    TimedOut {
        attempts: u32,
        last: Option<TaskSnapshot>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TaskAction {
    Pause,
    Resume,
}

impl TaskAction {
    fn name(self) -> &'static str {
        match self {
            Self::Pause => "pause",
            Self::Resume => "resume",
        }
    }

    fn is_confirmed(self, status: TaskStatus) -> bool {
        match self {
            Self::Pause => status == TaskStatus::Paused,
            Self::Resume => matches!(status, TaskStatus::Running | TaskStatus::Completed),
        }
    }
}

/// Task control facade over an admin backend.
pub struct TaskControlService<A: AdminApi, S: Sleeper = ThreadSleeper> {
    api: A,
    sleeper: S,
    policy: RetryPolicy,
}

impl<A: AdminApi> TaskControlService<A> {
    pub fn new(api: A) -> Self {
        Self::with_sleeper(api, ThreadSleeper, RetryPolicy::default())
    }
}

impl<A: AdminApi, S: Sleeper> TaskControlService<A, S> {
    pub fn with_sleeper(api: A, sleeper: S, policy: RetryPolicy) -> Self {
        Self {
            api,
            sleeper,
            policy,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Pauses a task and waits until the backend reports `paused`.
    pub fn pause(&mut self, task_id: &str) -> Result<TaskControlOutcome, TaskControlError> {
        self.run(task_id, TaskAction::Pause)
    }

    /// Resumes a task and waits until the backend reports `running`.
    ///
    /// A task that completes while resuming counts as confirmed.
    pub fn resume(&mut self, task_id: &str) -> Result<TaskControlOutcome, TaskControlError> {
        self.run(task_id, TaskAction::Resume)
    }

    fn run(
        &mut self,
        task_id: &str,
        action: TaskAction,
    ) -> Result<TaskControlOutcome, TaskControlError> {
        let task_id = task_id.trim();
        if matches!(task_id, "" | "." | "..") {
            return Err(TaskControlError::InvalidTaskId);
        }

        let result = self.request_and_wait(task_id, action);

        match &result {
            Ok(TaskControlOutcome::Confirmed(_)) => info!(
                "event=task_{} module=task status=ok task_id={task_id}",
                action.name()
            ),
            Ok(TaskControlOutcome::TimedOut { attempts, .. }) => warn!(
                "event=task_{} module=task status=timeout task_id={task_id} attempts={attempts}",
                action.name()
            ),
            Err(err) => warn!(
                "event=task_{} module=task status=error task_id={task_id} error={err}",
                action.name()
            ),
        }
        result
    }

    fn request_and_wait(
        &self,
        task_id: &str,
        action: TaskAction,
    ) -> Result<TaskControlOutcome, TaskControlError> {
        match action {
            TaskAction::Pause => self.api.pause_task(task_id)?,
            TaskAction::Resume => self.api.resume_task(task_id)?,
        }

        let mut last = None;
        let outcome = self.policy.poll(
            &self.sleeper,
            |_| -> Result<Option<TaskSnapshot>, ApiError> {
                let snapshot = self.api.get_task(task_id)?;
                if action.is_confirmed(snapshot.status) {
                    return Ok(Some(snapshot));
                }
                last = Some(snapshot);
                Ok(None)
            },
        )?;

        Ok(match outcome {
            PollOutcome::Ready { value, .. } => TaskControlOutcome::Confirmed(value),
            PollOutcome::Exhausted { attempts } => TaskControlOutcome::TimedOut { attempts, last },
        })
    }
}
