//! tokio 上の Future を Task として公開する

use std::error::Error as StdError;
use std::future::Future;

use crate::domain::TaskError;
use crate::impls::completion_source::{CompletionTask, TaskCompletionSource};

/// Future を現在の tokio runtime で実行し、その結果で完了する Task を返す
///
/// Future が panic した場合、source が drop されるので Task は abandon されます。
///
/// # Panics
/// tokio runtime の外で呼ぶと panic します（`tokio::spawn` と同じ）。
pub fn spawn_task<F, T, E>(future: F) -> CompletionTask<T>
where
    F: Future<Output = Result<T, E>> + Send + 'static,
    T: Clone + Send + Sync + 'static,
    E: StdError + Send + Sync + 'static,
{
    let source = TaskCompletionSource::new();
    let task = source.task();
    tokio::spawn(async move {
        match future.await {
            Ok(value) => source.try_set_value(value),
            Err(e) => source.try_set_error(TaskError::new(e)),
        };
    });
    task
}
