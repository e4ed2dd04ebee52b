//! Completable: one completion signal without payload, or an error.

use crate::domain::{RxError, SubscriptionId};

use super::source::{Emitter, Source, Subscription};

pub type CompletableSubscription = Subscription<()>;

pub struct CompletableEmitter {
    inner: Emitter<()>,
}

impl CompletableEmitter {
    pub fn id(&self) -> SubscriptionId {
        self.inner.id()
    }

    pub fn on_complete(&self) -> bool {
        self.inner.emit(Ok(()))
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

/// A cold completion-only source.
#[derive(Clone)]
pub struct Completable {
    source: Source<()>,
}

impl Completable {
    pub fn create<F>(f: F) -> Self
    where
        F: Fn(CompletableEmitter) + Send + Sync + 'static,
    {
        Self {
            source: Source::create(move |inner| f(CompletableEmitter { inner })),
        }
    }

    pub fn complete() -> Self {
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
        F: Fn() -> Completable + Send + Sync + 'static,
    {
        Self {
            source: Source::defer(move || f().source),
        }
    }

    pub(crate) fn from_source(source: Source<()>) -> Self {
        Self { source }
    }

    pub fn subscribe(&self) -> CompletableSubscription {
        self.source.subscribe()
    }
}
