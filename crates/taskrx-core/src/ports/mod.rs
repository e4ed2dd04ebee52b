//! Ports - 抽象化レイヤー
//!
//! adapter が依存する外部の非同期 Task をここで trait として定義します。
//! 実装は `impls` に置きます（InMemory / tokio 駆動）。

pub mod task;

pub use self::task::{CompleteListener, Task};
