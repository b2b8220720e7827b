//! ChannelStore port - チャンネルの最新状態の読み書き
//!
//! # 契約
//! - 1 回の呼び出しは他の呼び出しに対してアトミック
//! - 複数呼び出しにまたがる順序・一貫性は保証しない
//! - どの操作もブロックしない（短時間で終わる）

use std::sync::Arc;

use crate::domain::{Address, Introspection, Payload, StoreValue};

/// Latest payload + optional overlay per address.
pub trait ChannelStore: Send + Sync {
    /// Recorded overlay, or `None` if none was ever set. Never the default overlay.
    fn introspect(&self, address: &str) -> Option<Introspection>;

    /// Current payload, or `None` for an unknown address.
    fn fetch(&self, address: &str) -> Option<Arc<Payload>>;

    /// Payload and overlay read as one consistent pair.
    fn fetch_with_introspection(
        &self,
        address: &str,
    ) -> (Option<Arc<Payload>>, Option<Introspection>);

    /// Replaces the payload. The overlay is replaced only when `introspection`
    /// is `Some` and non-empty.
    fn update(&self, address: Address, payload: Payload, introspection: Option<Introspection>);

    /// Drops payload and overlay together. Unknown addresses are a no-op.
    fn remove(&self, address: &str);

    /// Indexed read, same as [`ChannelStore::fetch`].
    fn get(&self, address: &str) -> Option<Arc<Payload>> {
        self.fetch(address)
    }

    /// Indexed write, dispatching to [`ChannelStore::update`].
    fn set(&self, address: Address, value: StoreValue) {
        let (payload, introspection) = value.into_parts();
        self.update(address, payload, introspection);
    }
}
