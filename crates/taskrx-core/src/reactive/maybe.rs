//! Maybe: at most one value then completion, or an error.
//!
//! A subscription resolves to `Ok(Some(value))`, `Ok(None)` (completed
//! empty) or `Err(_)`.

use crate::domain::{RxError, SubscriptionId};

use super::source::{Emitter, Source, Subscription};

pub type MaybeSubscription<T> = Subscription<Option<T>>;

pub struct MaybeEmitter<T> {
    inner: Emitter<Option<T>>,
}

impl<T> MaybeEmitter<T> {
    pub fn id(&self) -> SubscriptionId {
        self.inner.id()
    }

    /// Emits the value; completion is implied.
    pub fn on_success(&self, value: T) -> bool {
        self.inner.emit(Ok(Some(value)))
    }

    /// Completes without a value. Ignored after `on_success`.
    pub fn on_complete(&self) -> bool {
        self.inner.emit(Ok(None))
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

pub struct Maybe<T> {
    source: Source<Option<T>>,
}

impl<T> Clone for Maybe<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
        }
    }
}

impl<T: Send + 'static> Maybe<T> {
    pub fn create<F>(f: F) -> Self
    where
        F: Fn(MaybeEmitter<T>) + Send + Sync + 'static,
    {
        Self {
            source: Source::create(move |inner| f(MaybeEmitter { inner })),
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

    pub fn empty() -> Self {
        Self::create(|emitter| {
            emitter.on_complete();
        })
    }

    pub fn error(error: RxError) -> Self {
        Self::create(move |emitter| {
            emitter.on_error(error.clone());
        })
    }

    pub fn defer<F>(f: F) -> Self
    where
        F: Fn() -> Maybe<T> + Send + Sync + 'static,
    {
        Self {
            source: Source::defer(move || f().source),
        }
    }

    pub(crate) fn from_source(source: Source<Option<T>>) -> Self {
        Self { source }
    }

    pub fn subscribe(&self) -> MaybeSubscription<T> {
        self.source.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn just_and_empty() {
        assert_eq!(Maybe::just(1).subscribe().await.unwrap(), Some(1));
        assert_eq!(Maybe::<i32>::empty().subscribe().await.unwrap(), None);
    }

    #[tokio::test]
    async fn completion_after_success_is_ignored() {
        let maybe = Maybe::create(|emitter| {
            assert!(emitter.on_success("v"));
            assert!(!emitter.on_complete());
        });
        assert_eq!(maybe.subscribe().await.unwrap(), Some("v"));
    }
}
