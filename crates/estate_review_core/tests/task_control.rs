mod common;

use common::{Call, FakeAdminApi};
use estate_review_core::{
    ApiError, RetryPolicy, Sleeper, TaskControlError, TaskControlOutcome, TaskControlService,
    TaskStatus,
};
use std::cell::Cell;
use std::time::Duration;

#[derive(Default)]
struct CountingSleeper {
    sleeps: Cell<u32>,
}

impl Sleeper for &CountingSleeper {
    fn sleep(&self, _duration: Duration) {
        self.sleeps.set(self.sleeps.get() + 1);
    }
}

fn api_with_statuses(statuses: &[TaskStatus]) -> FakeAdminApi {
    let api = FakeAdminApi::default();
    api.task_statuses.borrow_mut().extend(statuses.iter().copied());
    api
}

#[test]
fn pause_polls_until_backend_reports_paused() {
    let api = api_with_statuses(&[TaskStatus::Running, TaskStatus::Running, TaskStatus::Paused]);
    let sleeper = CountingSleeper::default();
    let mut service =
        TaskControlService::with_sleeper(&api, &sleeper, RetryPolicy::new(5, Duration::from_secs(1)));

    let outcome = service.pause("task-7").expect("pause should be confirmed");

    match outcome {
        TaskControlOutcome::Confirmed(snapshot) => assert_eq!(snapshot.status, TaskStatus::Paused),
        other => panic!("expected confirmation, got {other:?}"),
    }
    assert_eq!(api.calls()[0], Call::PauseTask("task-7".to_string()));
    assert_eq!(sleeper.sleeps.get(), 2);
}

#[test]
fn resume_times_out_after_bounded_attempts() {
    let api = api_with_statuses(&[TaskStatus::Paused]);
    let sleeper = CountingSleeper::default();
    let mut service =
        TaskControlService::with_sleeper(&api, &sleeper, RetryPolicy::new(3, Duration::from_secs(1)));

    let outcome = service.resume("task-7").unwrap();

    match outcome {
        TaskControlOutcome::TimedOut { attempts, last } => {
            assert_eq!(attempts, 3);
            assert_eq!(last.map(|snapshot| snapshot.status), Some(TaskStatus::Paused));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    let polls = api
        .calls()
        .into_iter()
        .filter(|call| matches!(call, Call::GetTask(_)))
        .count();
    assert_eq!(polls, 3);
    assert_eq!(sleeper.sleeps.get(), 2);
}

#[test]
fn resume_accepts_task_that_completed_meanwhile() {
    let api = api_with_statuses(&[TaskStatus::Completed]);
    let sleeper = CountingSleeper::default();
    let mut service = TaskControlService::with_sleeper(&api, &sleeper, RetryPolicy::default());

    let outcome = service.resume("t").unwrap();
    assert!(matches!(outcome, TaskControlOutcome::Confirmed(_)));
    assert_eq!(sleeper.sleeps.get(), 0);
}

#[test]
fn poll_error_aborts_without_further_polls() {
    let api = api_with_statuses(&[TaskStatus::Running]);
    *api.task_error.borrow_mut() = Some(ApiError::SessionExpired);
    let sleeper = CountingSleeper::default();
    let mut service = TaskControlService::with_sleeper(&api, &sleeper, RetryPolicy::default());

    let err = service.pause("t").unwrap_err();

    assert_eq!(err, TaskControlError::Api(ApiError::SessionExpired));
    assert!(err.to_notice("Pause").requires_reauth);
    assert_eq!(sleeper.sleeps.get(), 0);
}

#[test]
fn blank_task_id_is_rejected() {
    let api = FakeAdminApi::default();
    let sleeper = CountingSleeper::default();
    let mut service = TaskControlService::with_sleeper(&api, &sleeper, RetryPolicy::default());

    assert_eq!(service.pause("  "), Err(TaskControlError::InvalidTaskId));
    assert_eq!(service.resume(".."), Err(TaskControlError::InvalidTaskId));
    assert!(api.calls().is_empty());
}
