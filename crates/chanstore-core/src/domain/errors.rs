//! Errors - ストアのエラー型
//!
//! 未知の address への fetch / introspect / remove はエラーではない（None / no-op）。
//! エラーになるのは動的な値から引数を組み立てる境界だけ。

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// indexed write に payload でも (payload, overlay) でもない値が渡された
    #[error("invalid value: {0}")]
    InvalidArgument(String),

    #[error("unknown field key '{0}'")]
    UnknownFieldKey(String),
}
