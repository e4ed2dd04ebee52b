//! Extension methods on task handles.
//!
//! `task.single()` is shorthand for `single(move || Ok(task.clone()))`: the
//! handle is looked at again on each subscription.

use std::convert::Infallible;

use crate::ports::Task;
use crate::reactive::{Completable, Maybe, Single};

use super::rx_task;

pub trait TaskExt: Task + Clone + 'static {
    fn single(&self) -> Single<Self::Output> {
        let task = self.clone();
        rx_task::single(move || Ok::<_, Infallible>(task.clone()))
    }

    fn completes(&self) -> Completable {
        let task = self.clone();
        rx_task::completes(move || Ok::<_, Infallible>(task.clone()))
    }

    fn maybe(&self) -> Maybe<Self::Output> {
        let task = self.clone();
        rx_task::maybe(move || Ok::<_, Infallible>(task.clone()))
    }
}

impl<H: Task + Clone + 'static> TaskExt for H {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RxError, TaskError};
    use crate::impls::{CompletionTask, TaskCompletionSource};

    #[tokio::test]
    async fn extension_methods_convert_handles() {
        let ok = CompletionTask::for_value("ok".to_string());
        assert_eq!(ok.single().subscribe().await.unwrap(), "ok");
        ok.completes().subscribe().await.unwrap();
        assert_eq!(ok.maybe().subscribe().await.unwrap().as_deref(), Some("ok"));

        let empty = CompletionTask::<String>::for_empty();
        assert_eq!(empty.maybe().subscribe().await.unwrap(), None);
        assert!(matches!(
            empty.single().subscribe().await,
            Err(RxError::MissingValue)
        ));

        let failed = CompletionTask::<String>::for_error(TaskError::msg("boom"));
        assert_eq!(
            failed.completes().subscribe().await.unwrap_err().to_string(),
            "boom"
        );
    }

    #[tokio::test]
    async fn handle_state_is_read_at_subscription_time() {
        let source = TaskCompletionSource::<u8>::new();
        let single = source.task().single();

        source.set_value(9).unwrap();
        assert_eq!(single.subscribe().await.unwrap(), 9);
    }
}
