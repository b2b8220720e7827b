//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **DataStore**: プロセスで 1 つだけ存在する共有ストア

pub mod shared_store;

pub use self::shared_store::DataStore;
