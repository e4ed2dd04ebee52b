//! Impls - Task port の実装
//!
//! # 含まれる実装
//! - **TaskCompletionSource / CompletionTask**: InMemory の Task（テスト・組み込み用）
//! - **spawn_task**: tokio の Future を Task として公開

pub mod completion_source;
pub mod spawned;

pub use self::completion_source::{CompletionTask, TaskCompletionSource};
pub use self::spawned::spawn_task;
