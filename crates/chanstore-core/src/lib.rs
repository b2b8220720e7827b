//! chanstore-core
//!
//! Process-wide store for the latest state of named channels.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（address, field_key, introspection, payload, store_value, errors）
//! - **ports**: 抽象化レイヤー（ChannelStore trait）
//! - **impls**: 実装（プロセス共有の DataStore）
//!
//! Producers write with `update` / `remove`, consumers read with `fetch` /
//! `introspect`. The store never interprets payload or overlay contents.

pub mod domain;
pub mod ports;
pub mod impls;

pub use domain::{
    Address, FieldKey, Introspection, Payload, RoleAssignments, StoreError, StoreValue,
    default_introspection, generate_introspection,
};
pub use impls::DataStore;
pub use ports::ChannelStore;
