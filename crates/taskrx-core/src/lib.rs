//! taskrx-core
//!
//! callback 駆動の非同期 Task を reactive primitive（Single / Completable / Maybe）に
//! 変換する adapter。
//!
//! # モジュール構成
//! - **domain**: エラー型、ID、Task の結果
//! - **ports**: Task trait（listener の登録・解除）
//! - **impls**: Task の実装（TaskCompletionSource, spawn_task）
//! - **reactive**: cold で再 subscribe 可能な Single / Completable / Maybe
//! - **adapter**: Task → reactive の変換（RxTask, TaskExt）
//! - **config**: adapter の設定

pub mod adapter;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod reactive;

pub use adapter::{RxTask, TaskExt};
pub use config::{AdapterConfig, MissingValuePolicy};
pub use domain::{RxError, TaskError, TaskResult};
pub use ports::Task;
