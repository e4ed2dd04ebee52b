//! Errors - エラー型
//!
//! - `TaskError`: Task が失敗したときのエラーオブジェクト（そのまま転送する）
//! - `RxError`: reactive primitive の error channel に流れるエラー
//! - `TaskStateError`: TaskCompletionSource の二重完了

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// TaskError は Task の失敗を表すエラーオブジェクト
///
/// 同じ Task を複数の listener が観測できるように `Arc` で共有します。
/// adapter はこのオブジェクトを包み直さずに転送するので、
/// `ptr_eq` で「同じエラーが届いた」ことを確認できます。
#[derive(Clone)]
pub struct TaskError {
    inner: Arc<dyn StdError + Send + Sync + 'static>,
}

impl TaskError {
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(error),
        }
    }

    /// 文字列メッセージだけのエラーを作成
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(MessageError(message.into()))
    }

    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        self.inner.downcast_ref::<E>()
    }

    /// 同一のエラーオブジェクトかどうか
    pub fn ptr_eq(&self, other: &TaskError) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner, f)
    }
}

impl fmt::Display for TaskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&*self.inner, f)
    }
}

impl StdError for TaskError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source()
    }
}

impl From<Arc<dyn StdError + Send + Sync + 'static>> for TaskError {
    fn from(inner: Arc<dyn StdError + Send + Sync + 'static>) -> Self {
        Self { inner }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
struct MessageError(String);

/// RxError は subscription に届く error signal
#[derive(Debug, Clone, thiserror::Error)]
pub enum RxError {
    /// The underlying task failed. Display and source are the task's own.
    #[error(transparent)]
    Task(TaskError),

    /// The supplier failed before handing out a task.
    #[error("task supplier failed: {0}")]
    Supplier(TaskError),

    #[error("task succeeded without a value")]
    MissingValue,

    #[error("task was dropped before producing a result")]
    Abandoned,
}

impl RxError {
    pub fn supplier<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        RxError::Supplier(TaskError::new(error))
    }

    /// Task / Supplier が持っている TaskError
    pub fn task_error(&self) -> Option<&TaskError> {
        match self {
            RxError::Task(e) | RxError::Supplier(e) => Some(e),
            RxError::MissingValue | RxError::Abandoned => None,
        }
    }
}

impl From<TaskError> for RxError {
    fn from(error: TaskError) -> Self {
        RxError::Task(error)
    }
}

/// TaskStateError は TaskCompletionSource の状態エラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskStateError {
    #[error("task is already complete")]
    AlreadyComplete,
}
