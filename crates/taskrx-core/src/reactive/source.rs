//! Cold source core shared by `Single`, `Completable` and `Maybe`.
//!
//! A source stores a deferred action. Every `subscribe()` creates a fresh
//! emitter/subscription pair and runs the action with the emitter, so nothing
//! is cached between subscriptions.
//!
//! The emitter delivers one terminal `Result<T, RxError>` through a oneshot
//! channel. The subscription is the receiving end and implements `Future`.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::domain::{RxError, SubscriptionId};

type Cancellable = Box<dyn FnOnce() + Send + 'static>;
pub(crate) type OnSubscribe<T> = Arc<dyn Fn(Emitter<T>) + Send + Sync + 'static>;

struct EmitterState<T> {
    sender: Option<oneshot::Sender<Result<T, RxError>>>,
    cancellable: Option<Cancellable>,
    disposed: bool,
}

struct Shared<T> {
    state: Mutex<EmitterState<T>>,
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, EmitterState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Producer side of one subscription.
///
/// Only the first terminal signal is delivered. Dropping the emitter without
/// a signal resolves the subscription with [`RxError::Abandoned`].
pub struct Emitter<T> {
    id: SubscriptionId,
    shared: Arc<Shared<T>>,
}

impl<T> Emitter<T> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// `true` once the subscriber disposed or a terminal signal went out.
    pub fn is_disposed(&self) -> bool {
        let state = self.shared.lock();
        state.disposed || state.sender.is_none()
    }

    /// Delivers the terminal signal. Returns `false` if it was ignored.
    pub fn emit(&self, outcome: Result<T, RxError>) -> bool {
        let (sender, cancellable) = {
            let mut state = self.shared.lock();
            if state.disposed {
                return false;
            }
            let Some(sender) = state.sender.take() else {
                return false;
            };
            (sender, state.cancellable.take())
        };
        drop(cancellable);

        tracing::trace!(subscription = %self.id, ok = outcome.is_ok(), "emit");
        sender.send(outcome).is_ok()
    }

    /// Registers the action to run if the subscriber disposes first.
    ///
    /// Runs `f` right away when already disposed. Replacing an earlier action
    /// runs the earlier one.
    pub fn set_cancellable<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let run_now: Option<Cancellable> = {
            let mut state = self.shared.lock();
            if state.disposed {
                Some(Box::new(f))
            } else if state.sender.is_none() {
                None
            } else {
                state.cancellable.replace(Box::new(f))
            }
        };
        if let Some(cancel) = run_now {
            cancel();
        }
    }
}

impl<T> Drop for Emitter<T> {
    fn drop(&mut self) {
        let (sender, cancellable) = {
            let mut state = self.shared.lock();
            (state.sender.take(), state.cancellable.take())
        };
        if sender.is_some() {
            tracing::debug!(subscription = %self.id, "emitter dropped without terminal signal");
        }
        drop(cancellable);
    }
}

/// Consumer side of one subscription.
///
/// Resolves with the terminal signal. Dropping it (or calling [`dispose`])
/// disposes the subscription: the registered cancellable runs and nothing is
/// delivered afterwards.
///
/// [`dispose`]: Subscription::dispose
pub struct Subscription<T> {
    id: SubscriptionId,
    rx: oneshot::Receiver<Result<T, RxError>>,
    shared: Arc<Shared<T>>,
}

impl<T> Subscription<T> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn dispose(self) {
        drop(self);
    }
}

impl<T> Future for Subscription<T> {
    type Output = Result<T, RxError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(_)) => Poll::Ready(Err(RxError::Abandoned)),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.rx.close();
        let cancellable = {
            let mut state = self.shared.lock();
            if state.disposed {
                None
            } else {
                state.disposed = true;
                state.cancellable.take()
            }
        };
        if let Some(cancel) = cancellable {
            tracing::debug!(subscription = %self.id, "disposed before terminal signal");
            cancel();
        }
    }
}

/// Deferred action plus the subscribe protocol.
pub(crate) struct Source<T> {
    on_subscribe: OnSubscribe<T>,
}

impl<T> Clone for Source<T> {
    fn clone(&self) -> Self {
        Self {
            on_subscribe: self.on_subscribe.clone(),
        }
    }
}

impl<T: Send + 'static> Source<T> {
    pub(crate) fn create<F>(f: F) -> Self
    where
        F: Fn(Emitter<T>) + Send + Sync + 'static,
    {
        Self {
            on_subscribe: Arc::new(f),
        }
    }

    /// Emits the same terminal signal to every subscription.
    pub(crate) fn from_outcome(outcome: Result<T, RxError>) -> Self
    where
        T: Clone + Sync,
    {
        Self::create(move |emitter| {
            emitter.emit(outcome.clone());
        })
    }

    /// Hands the emitter of each subscription to the source built by `f`.
    pub(crate) fn defer<F>(f: F) -> Self
    where
        F: Fn() -> Source<T> + Send + Sync + 'static,
    {
        Self::create(move |emitter| {
            let inner = f();
            (inner.on_subscribe)(emitter)
        })
    }

    pub(crate) fn subscribe(&self) -> Subscription<T> {
        let id = SubscriptionId::generate();
        let (tx, rx) = oneshot::channel();
        let shared = Arc::new(Shared {
            state: Mutex::new(EmitterState {
                sender: Some(tx),
                cancellable: None,
                disposed: false,
            }),
        });

        tracing::debug!(subscription = %id, "subscribe");
        (self.on_subscribe)(Emitter {
            id,
            shared: shared.clone(),
        });

        Subscription { id, rx, shared }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn first_terminal_signal_wins() {
        let source = Source::create(|emitter: Emitter<i32>| {
            assert!(emitter.emit(Ok(1)));
            assert!(!emitter.emit(Ok(2)));
            assert!(!emitter.emit(Err(RxError::MissingValue)));
            assert!(emitter.is_disposed());
        });
        assert_eq!(source.subscribe().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn each_subscribe_runs_the_action() {
        let runs = Arc::new(AtomicU32::new(0));
        let source = Source::create({
            let runs = runs.clone();
            move |emitter: Emitter<u32>| {
                let n = runs.fetch_add(1, Ordering::SeqCst);
                emitter.emit(Ok(n));
            }
        });

        assert_eq!(source.subscribe().await.unwrap(), 0);
        assert_eq!(source.clone().subscribe().await.unwrap(), 1);
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn dropped_emitter_resolves_abandoned() {
        let source = Source::create(|emitter: Emitter<i32>| drop(emitter));
        assert!(matches!(source.subscribe().await, Err(RxError::Abandoned)));
    }

    #[tokio::test]
    async fn dispose_runs_cancellable_and_blocks_late_emission() {
        let (tx, rx) = std::sync::mpsc::channel::<Emitter<i32>>();
        let cancelled = Arc::new(AtomicU32::new(0));
        let source = Source::create({
            let cancelled = cancelled.clone();
            move |emitter: Emitter<i32>| {
                let cancelled = cancelled.clone();
                emitter.set_cancellable(move || {
                    cancelled.fetch_add(1, Ordering::SeqCst);
                });
                tx.send(emitter).unwrap();
            }
        });

        let subscription = source.subscribe();
        let emitter = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(!emitter.is_disposed());

        subscription.dispose();
        assert_eq!(cancelled.load(Ordering::SeqCst), 1);
        assert!(emitter.is_disposed());
        assert!(!emitter.emit(Ok(5)));
    }

    #[tokio::test]
    async fn cancellable_is_not_run_after_terminal_signal() {
        let cancelled = Arc::new(AtomicU32::new(0));
        let source = Source::create({
            let cancelled = cancelled.clone();
            move |emitter: Emitter<()>| {
                let cancelled = cancelled.clone();
                emitter.set_cancellable(move || {
                    cancelled.fetch_add(1, Ordering::SeqCst);
                });
                emitter.emit(Ok(()));
            }
        });

        source.subscribe().await.unwrap();
        assert_eq!(cancelled.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn defer_builds_a_new_source_per_subscription() {
        let built = Arc::new(AtomicU32::new(0));
        let source = Source::defer({
            let built = built.clone();
            move || {
                let n = built.fetch_add(1, Ordering::SeqCst);
                Source::create(move |emitter: Emitter<u32>| {
                    emitter.emit(Ok(n * 10));
                })
            }
        });
        assert_eq!(built.load(Ordering::SeqCst), 0);

        assert_eq!(source.subscribe().await.unwrap(), 0);
        assert_eq!(source.subscribe().await.unwrap(), 10);
    }
}
