//! Domain model (addresses, field roles, overlays, payloads, errors).
//!
//! - address: チャンネルを識別する不透明な文字列
//! - field_key: 9 つの意味役割（閉じた集合）
//! - introspection: 役割 → payload キーの対応表
//! - payload: 最新スナップショットと役割解決
//! - store_value: indexed write の引数
//! - errors: エラー型

pub mod address;
pub mod errors;
pub mod field_key;
pub mod introspection;
pub mod payload;
pub mod store_value;

pub use self::address::Address;
pub use self::errors::StoreError;
pub use self::field_key::FieldKey;
pub use self::introspection::{
    Introspection, RoleAssignments, default_introspection, generate_introspection,
};
pub use self::payload::{Payload, resolve};
pub use self::store_value::StoreValue;
