//! Adapter - Task を reactive primitive に橋渡しする
//!
//! # 主要コンポーネント
//! - **RxTask**: 設定付きの変換器（`single` / `completes` / `maybe`）
//! - **TaskExt**: Task handle に生やす拡張メソッド
//! - **bridge**: listener の登録と dispose 時の取り外し

mod bridge;
pub mod ext;
pub mod rx_task;

pub use self::ext::TaskExt;
pub use self::rx_task::{
    RxTask, completes, completes_from_task, maybe, maybe_from_task, single, single_from_task,
};
