//! Task → Source bridge.
//!
//! One completion listener per subscription. Disposing the subscription
//! detaches the listener; a listener that fires on a disposed emitter does
//! nothing.

use std::sync::Arc;

use crate::domain::{OutcomeKind, RxError, TaskResult};
use crate::ports::Task;
use crate::reactive::source::Source;

/// Builds a source that forwards `task`'s outcome through `map`.
///
/// A task that is already complete is read once here and its mapped outcome
/// is replayed to every subscription without touching the task again.
pub(crate) fn bridge<H, U, M>(task: H, map: M) -> Source<U>
where
    H: Task + Clone + 'static,
    U: Clone + Send + Sync + 'static,
    M: Fn(TaskResult<H::Output>) -> Result<U, RxError> + Send + Sync + 'static,
{
    if let Some(result) = task.result() {
        return Source::from_outcome(map(result));
    }

    let map = Arc::new(map);
    Source::create(move |emitter| {
        let emitter = Arc::new(emitter);
        let id = emitter.id();

        let key = task.add_on_complete_listener(Box::new({
            let emitter = emitter.clone();
            let map = map.clone();
            move |result: TaskResult<H::Output>| {
                if emitter.is_disposed() {
                    return;
                }
                tracing::debug!(
                    subscription = %id,
                    outcome = %OutcomeKind::of(&result),
                    "task completed"
                );
                let outcome = map(result);
                if matches!(outcome, Err(RxError::MissingValue)) {
                    tracing::warn!(subscription = %id, "task succeeded without a value");
                }
                emitter.emit(outcome);
            }
        }));
        tracing::debug!(subscription = %id, listener = key.get(), "listener registered");

        let task = task.clone();
        emitter.set_cancellable(move || {
            if task.remove_listener(key) {
                tracing::debug!(subscription = %id, listener = key.get(), "listener detached");
            }
        });
    })
}
