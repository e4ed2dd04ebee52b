//! Reactive - cold, re-subscribable primitives
//!
//! - **Single**: 値を 1 回だけ emit、または error
//! - **Completable**: 完了を 1 回だけ emit、または error
//! - **Maybe**: 値を高々 1 回 emit して完了、または error
//!
//! subscribe() は毎回 deferred action を実行し、`Future` を返します。
//! Future を drop すると dispose され、以降の emit は届きません。

pub mod completable;
pub mod maybe;
pub mod single;
pub mod source;

pub use self::completable::{Completable, CompletableEmitter, CompletableSubscription};
pub use self::maybe::{Maybe, MaybeEmitter, MaybeSubscription};
pub use self::single::{Single, SingleEmitter, SingleSubscription};
pub use self::source::{Emitter, Subscription};
