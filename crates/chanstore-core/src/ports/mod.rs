//! Ports - 抽象化レイヤー
//!
//! producer / consumer はこの trait 越しにストアを使う。
//! 実装は `impls` 配下（プロセス共有の DataStore）。

pub mod channel_store;

pub use self::channel_store::ChannelStore;
