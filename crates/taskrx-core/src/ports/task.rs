//! Task port - callback 駆動の非同期 Task の抽象化
//!
//! Task handle は外部のサブシステム（プラットフォーム API など）が作成・所有します。
//! adapter は listener を付け外しするだけで、Task を作ったり完了させたりはしません。
//!
//! # 契約
//! - 結果は高々 1 回だけ確定する（value / 値なし / failure）
//! - 登録された listener は高々 1 回だけ呼ばれる
//! - 完了済みの Task に listener を登録した場合、呼び出し元のスレッドで即座に呼ばれる
//! - `remove_listener` 済みの listener は呼ばれない

use crate::domain::{ListenerKey, TaskError, TaskResult};

/// 完了 listener
pub type CompleteListener<T> = Box<dyn FnOnce(TaskResult<T>) + Send + 'static>;

/// Task は callback 駆動の非同期処理への handle
///
/// # Thread Safety
/// - `Send + Sync` を要求（listener はどのスレッドからでも登録できる）
/// - listener は Task を完了させたスレッドで呼ばれる
pub trait Task: Send + Sync {
    /// 成功時の値の型（複数の listener に配るため `Clone`）
    type Output: Clone + Send + Sync + 'static;

    fn is_complete(&self) -> bool;

    /// 完了済みなら結果のコピー、未完了なら `None`
    fn result(&self) -> Option<TaskResult<Self::Output>>;

    fn add_on_complete_listener(&self, listener: CompleteListener<Self::Output>) -> ListenerKey;

    /// 未発火の listener を外す。外せたら `true`
    fn remove_listener(&self, key: ListenerKey) -> bool;

    fn is_successful(&self) -> bool {
        matches!(self.result(), Some(Ok(_)))
    }

    /// 失敗していればそのエラー
    fn error(&self) -> Option<TaskError> {
        match self.result() {
            Some(Err(e)) => Some(e),
            _ => None,
        }
    }

    /// 成功時のみ呼ばれる listener
    fn add_on_success_listener<F>(&self, listener: F) -> ListenerKey
    where
        Self: Sized,
        F: FnOnce(Option<Self::Output>) + Send + 'static,
    {
        self.add_on_complete_listener(Box::new(move |result| {
            if let Ok(value) = result {
                listener(value);
            }
        }))
    }

    /// 失敗時のみ呼ばれる listener
    fn add_on_failure_listener<F>(&self, listener: F) -> ListenerKey
    where
        Self: Sized,
        F: FnOnce(TaskError) + Send + 'static,
    {
        self.add_on_complete_listener(Box::new(move |result| {
            if let Err(e) = result {
                listener(e);
            }
        }))
    }
}
