//! RxTask - Task を Single / Completable / Maybe に変換する
//!
//! # 2 種類の入口
//! - **supplier 版** (`single`, `completes`, `maybe`): subscribe のたびに supplier を呼ぶ。
//!   再 subscribe すると Task も作り直される（キャッシュしない）。
//! - **handle 版** (`*_from_task`): 手元の Task handle をそのまま変換する。
//!
//! supplier が `Err` を返した場合は `RxError::Supplier` として subscription に届きます。
//! 呼び出し元で panic したり同期的にエラーになったりはしません。

use std::error::Error as StdError;

use crate::config::{AdapterConfig, MissingValuePolicy};
use crate::domain::{RxError, TaskResult};
use crate::ports::Task;
use crate::reactive::{Completable, Maybe, Single};

use super::bridge::bridge;

/// RxTask は設定を持った adapter
///
/// # 使用例
/// ```ignore
/// let rx = RxTask::new(AdapterConfig::default());
/// let user = rx.single(|| api.fetch_user(id)).subscribe().await?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RxTask {
    config: AdapterConfig,
}

impl RxTask {
    pub fn new(config: AdapterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// 成功時の値を 1 回だけ emit する Single
    ///
    /// 値なしで成功した場合は `RxError::MissingValue`。
    pub fn single<F, H, E>(&self, supplier: F) -> Single<H::Output>
    where
        F: Fn() -> Result<H, E> + Send + Sync + 'static,
        H: Task + Clone + 'static,
        E: StdError + Send + Sync + 'static,
    {
        let rx = self.clone();
        Single::defer(move || match supplier() {
            Ok(task) => rx.single_from_task(task),
            Err(e) => Single::error(supplier_failed(e)),
        })
    }

    /// 成功したら完了だけを emit する Completable（値は捨てる）
    pub fn completes<F, H, E>(&self, supplier: F) -> Completable
    where
        F: Fn() -> Result<H, E> + Send + Sync + 'static,
        H: Task + Clone + 'static,
        E: StdError + Send + Sync + 'static,
    {
        let rx = self.clone();
        Completable::defer(move || match supplier() {
            Ok(task) => rx.completes_from_task(task),
            Err(e) => Completable::error(supplier_failed(e)),
        })
    }

    /// 値があれば emit して完了、値なしなら `maybe_missing_value` に従う Maybe
    pub fn maybe<F, H, E>(&self, supplier: F) -> Maybe<H::Output>
    where
        F: Fn() -> Result<H, E> + Send + Sync + 'static,
        H: Task + Clone + 'static,
        E: StdError + Send + Sync + 'static,
    {
        let rx = self.clone();
        Maybe::defer(move || match supplier() {
            Ok(task) => rx.maybe_from_task(task),
            Err(e) => Maybe::error(supplier_failed(e)),
        })
    }

    pub fn single_from_task<H>(&self, task: H) -> Single<H::Output>
    where
        H: Task + Clone + 'static,
    {
        Single::from_source(bridge(task, |result: TaskResult<H::Output>| match result {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(RxError::MissingValue),
            Err(e) => Err(RxError::Task(e)),
        }))
    }

    pub fn completes_from_task<H>(&self, task: H) -> Completable
    where
        H: Task + Clone + 'static,
    {
        Completable::from_source(bridge(task, |result: TaskResult<H::Output>| {
            result.map(|_| ()).map_err(RxError::Task)
        }))
    }

    pub fn maybe_from_task<H>(&self, task: H) -> Maybe<H::Output>
    where
        H: Task + Clone + 'static,
    {
        let policy = self.config.maybe_missing_value;
        Maybe::from_source(bridge(task, move |result: TaskResult<H::Output>| match result {
            Ok(None) if policy == MissingValuePolicy::Error => Err(RxError::MissingValue),
            Ok(value) => Ok(value),
            Err(e) => Err(RxError::Task(e)),
        }))
    }
}

fn supplier_failed<E>(error: E) -> RxError
where
    E: StdError + Send + Sync + 'static,
{
    tracing::warn!(error = %error, "task supplier failed");
    RxError::supplier(error)
}

/// [`RxTask::single`] with the default configuration.
pub fn single<F, H, E>(supplier: F) -> Single<H::Output>
where
    F: Fn() -> Result<H, E> + Send + Sync + 'static,
    H: Task + Clone + 'static,
    E: StdError + Send + Sync + 'static,
{
    RxTask::default().single(supplier)
}

/// [`RxTask::completes`] with the default configuration.
pub fn completes<F, H, E>(supplier: F) -> Completable
where
    F: Fn() -> Result<H, E> + Send + Sync + 'static,
    H: Task + Clone + 'static,
    E: StdError + Send + Sync + 'static,
{
    RxTask::default().completes(supplier)
}

/// [`RxTask::maybe`] with the default configuration.
pub fn maybe<F, H, E>(supplier: F) -> Maybe<H::Output>
where
    F: Fn() -> Result<H, E> + Send + Sync + 'static,
    H: Task + Clone + 'static,
    E: StdError + Send + Sync + 'static,
{
    RxTask::default().maybe(supplier)
}

pub fn single_from_task<H>(task: H) -> Single<H::Output>
where
    H: Task + Clone + 'static,
{
    RxTask::default().single_from_task(task)
}

pub fn completes_from_task<H>(task: H) -> Completable
where
    H: Task + Clone + 'static,
{
    RxTask::default().completes_from_task(task)
}

pub fn maybe_from_task<H>(task: H) -> Maybe<H::Output>
where
    H: Task + Clone + 'static,
{
    RxTask::default().maybe_from_task(task)
}
