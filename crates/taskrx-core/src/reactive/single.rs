//! Single: exactly one value, or an error.

use crate::domain::{RxError, SubscriptionId};

use super::source::{Emitter, Source, Subscription};

pub type SingleSubscription<T> = Subscription<T>;

/// Emitter handed to [`Single::create`].
pub struct SingleEmitter<T> {
    inner: Emitter<T>,
}

impl<T> SingleEmitter<T> {
    pub fn id(&self) -> SubscriptionId {
        self.inner.id()
    }

    pub fn on_success(&self, value: T) -> bool {
        self.inner.emit(Ok(value))
    }

    pub fn on_error(&self, error: RxError) -> bool {
        self.inner.emit(Err(error))
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }

    pub fn set_cancellable<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.inner.set_cancellable(f)
    }
}

/// A cold single-value source.
///
/// # 使用例
/// ```ignore
/// let single = Single::create(|emitter| {
///     emitter.on_success(42);
/// });
/// assert_eq!(single.subscribe().await?, 42);
/// ```
pub struct Single<T> {
    source: Source<T>,
}

impl<T> Clone for Single<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
        }
    }
}

impl<T: Send + 'static> Single<T> {
    /// `f` runs once per subscription.
    pub fn create<F>(f: F) -> Self
    where
        F: Fn(SingleEmitter<T>) + Send + Sync + 'static,
    {
        Self {
            source: Source::create(move |inner| f(SingleEmitter { inner })),
        }
    }

    pub fn just(value: T) -> Self
    where
        T: Clone + Sync,
    {
        Self::create(move |emitter| {
            emitter.on_success(value.clone());
        })
    }

    pub fn error(error: RxError) -> Self {
        Self::create(move |emitter| {
            emitter.on_error(error.clone());
        })
    }

    /// `f` builds the actual single at each subscription.
    pub fn defer<F>(f: F) -> Self
    where
        F: Fn() -> Single<T> + Send + Sync + 'static,
    {
        Self {
            source: Source::defer(move || f().source),
        }
    }

    pub(crate) fn from_source(source: Source<T>) -> Self {
        Self { source }
    }

    pub fn subscribe(&self) -> SingleSubscription<T> {
        self.source.subscribe()
    }
}
