//! TaskCompletionSource - InMemory の Task 実装
//!
//! 生産者側（`TaskCompletionSource`）と消費者側（`CompletionTask`）に分かれています。
//!
//! # 実装詳細
//! - `Arc<Mutex<State>>` で結果と listener を共有
//! - listener はロックを外してから呼ぶ（listener 内で Task に触っても deadlock しない）
//! - 未完了のまま source が drop されたら abandon 扱い（listener は呼ばずに捨てる）

use std::mem;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::{ListenerKey, TaskError, TaskResult, TaskStateError};
use crate::ports::{CompleteListener, Task};

struct State<T> {
    result: Option<TaskResult<T>>,
    listeners: Vec<(ListenerKey, CompleteListener<T>)>,
    next_key: u64,
    abandoned: bool,
}

/// CompletionTask は TaskCompletionSource が完了させる Task の handle
///
/// `Clone` は同じ Task を指す handle を増やすだけです。
pub struct CompletionTask<T> {
    state: Arc<Mutex<State<T>>>,
}

impl<T> Clone for CompletionTask<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> CompletionTask<T> {
    fn pending() -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                result: None,
                listeners: Vec::new(),
                next_key: 0,
                abandoned: false,
            })),
        }
    }

    fn completed(result: TaskResult<T>) -> Self {
        let task = Self::pending();
        task.complete(result);
        task
    }

    /// 値で完了済みの Task
    pub fn for_value(value: T) -> Self {
        Self::completed(Ok(Some(value)))
    }

    /// 値なしで完了済みの Task
    pub fn for_empty() -> Self {
        Self::completed(Ok(None))
    }

    /// 失敗済みの Task
    pub fn for_error(error: TaskError) -> Self {
        Self::completed(Err(error))
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn complete(&self, result: TaskResult<T>) -> bool {
        let listeners = {
            let mut state = self.lock();
            if state.result.is_some() || state.abandoned {
                return false;
            }
            state.result = Some(result.clone());
            mem::take(&mut state.listeners)
        };

        for (_, listener) in listeners {
            listener(result.clone());
        }
        true
    }

    fn abandon(&self) {
        let listeners = {
            let mut state = self.lock();
            if state.result.is_some() {
                return;
            }
            state.abandoned = true;
            mem::take(&mut state.listeners)
        };
        tracing::debug!(dropped = listeners.len(), "task abandoned before completion");
        drop(listeners);
    }
}

impl<T: Clone + Send + Sync + 'static> Task for CompletionTask<T> {
    type Output = T;

    fn is_complete(&self) -> bool {
        self.lock().result.is_some()
    }

    fn result(&self) -> Option<TaskResult<T>> {
        self.lock().result.clone()
    }

    fn add_on_complete_listener(&self, listener: CompleteListener<T>) -> ListenerKey {
        let mut state = self.lock();
        let key = ListenerKey::new(state.next_key);
        state.next_key += 1;

        if let Some(result) = state.result.clone() {
            drop(state);
            listener(result);
        } else if state.abandoned {
            drop(state);
            drop(listener);
        } else {
            state.listeners.push((key, listener));
        }
        key
    }

    fn remove_listener(&self, key: ListenerKey) -> bool {
        let removed = {
            let mut state = self.lock();
            let index = state.listeners.iter().position(|(k, _)| *k == key);
            index.map(|index| state.listeners.remove(index))
        };
        removed.is_some()
    }
}

/// TaskCompletionSource は CompletionTask を完了させる生産者側
///
/// # 使用例
/// ```ignore
/// let source = TaskCompletionSource::new();
/// let task = source.task();
/// source.set_value("ok".to_string())?;
/// assert!(task.is_complete());
/// ```
pub struct TaskCompletionSource<T: Clone + Send + Sync + 'static> {
    task: CompletionTask<T>,
}

impl<T: Clone + Send + Sync + 'static> TaskCompletionSource<T> {
    pub fn new() -> Self {
        Self {
            task: CompletionTask::pending(),
        }
    }

    /// 消費者側の handle
    pub fn task(&self) -> CompletionTask<T> {
        self.task.clone()
    }

    pub fn set_value(&self, value: T) -> Result<(), TaskStateError> {
        self.set(Ok(Some(value)))
    }

    pub fn set_empty(&self) -> Result<(), TaskStateError> {
        self.set(Ok(None))
    }

    pub fn set_error(&self, error: TaskError) -> Result<(), TaskStateError> {
        self.set(Err(error))
    }

    pub fn try_set_value(&self, value: T) -> bool {
        self.task.complete(Ok(Some(value)))
    }

    pub fn try_set_empty(&self) -> bool {
        self.task.complete(Ok(None))
    }

    pub fn try_set_error(&self, error: TaskError) -> bool {
        self.task.complete(Err(error))
    }

    fn set(&self, result: TaskResult<T>) -> Result<(), TaskStateError> {
        if self.task.complete(result) {
            Ok(())
        } else {
            Err(TaskStateError::AlreadyComplete)
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Default for TaskCompletionSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + Sync + 'static> Drop for TaskCompletionSource<T> {
    fn drop(&mut self) {
        self.task.abandon();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn recorder<T: Send + 'static>() -> (Arc<Mutex<Vec<TaskResult<T>>>>, impl Fn() -> CompleteListener<T>) {
        let seen: Arc<Mutex<Vec<TaskResult<T>>>> = Arc::new(Mutex::new(Vec::new()));
        let make = {
            let seen = seen.clone();
            move || -> CompleteListener<T> {
                let seen = seen.clone();
                Box::new(move |r| seen.lock().unwrap().push(r))
            }
        };
        (seen, make)
    }

    #[test]
    fn listeners_fire_once_on_completion() {
        let source = TaskCompletionSource::<i32>::new();
        let task = source.task();
        let (seen, listener) = recorder::<i32>();

        task.add_on_complete_listener(listener());
        task.add_on_complete_listener(listener());
        assert!(seen.lock().unwrap().is_empty());

        source.set_value(7).unwrap();
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert!(matches!(seen[0], Ok(Some(7))));
    }

    #[test]
    fn listener_on_completed_task_fires_immediately() {
        let task = CompletionTask::for_value("ok".to_string());
        let (seen, listener) = recorder::<String>();

        task.add_on_complete_listener(listener());
        assert_eq!(seen.lock().unwrap().len(), 1);
        assert!(task.is_successful());
    }

    #[test]
    fn second_completion_is_rejected() {
        let source = TaskCompletionSource::<i32>::new();
        source.set_empty().unwrap();
        assert_eq!(source.set_value(1), Err(TaskStateError::AlreadyComplete));
        assert!(!source.try_set_error(TaskError::msg("late")));
        assert!(matches!(source.task().result(), Some(Ok(None))));
    }

    #[test]
    fn removed_listener_is_not_called() {
        let source = TaskCompletionSource::<i32>::new();
        let task = source.task();
        let calls = Arc::new(AtomicU32::new(0));

        let key = task.add_on_complete_listener({
            let calls = calls.clone();
            Box::new(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            })
        });
        assert!(task.remove_listener(key));
        assert!(!task.remove_listener(key));

        source.set_value(1).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn success_and_failure_listeners_are_exclusive() {
        let source = TaskCompletionSource::<i32>::new();
        let task = source.task();
        let successes = Arc::new(AtomicU32::new(0));
        let failures = Arc::new(AtomicU32::new(0));

        task.add_on_success_listener({
            let successes = successes.clone();
            move |_| {
                successes.fetch_add(1, Ordering::SeqCst);
            }
        });
        task.add_on_failure_listener({
            let failures = failures.clone();
            move |_| {
                failures.fetch_add(1, Ordering::SeqCst);
            }
        });

        let error = TaskError::msg("boom");
        source.set_error(error.clone()).unwrap();

        assert_eq!(successes.load(Ordering::SeqCst), 0);
        assert_eq!(failures.load(Ordering::SeqCst), 1);
        assert!(task.error().unwrap().ptr_eq(&error));
    }

    #[test]
    fn dropping_pending_source_drops_listeners() {
        let source = TaskCompletionSource::<i32>::new();
        let task = source.task();
        let marker = Arc::new(());

        task.add_on_complete_listener({
            let marker = marker.clone();
            Box::new(move |_| drop(marker))
        });
        assert_eq!(Arc::strong_count(&marker), 2);

        drop(source);
        assert_eq!(Arc::strong_count(&marker), 1);
        assert!(!task.is_complete());
    }
}
