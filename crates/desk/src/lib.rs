//! Desk pages backed by server RPC methods.
//!
//! Thin wrappers: call a method, normalize its `message` payload, hand back
//! something a page can render. No sync logic lives here.

pub mod configuration;
pub mod fetch;
pub mod rpc;

pub use configuration::{TallyConfiguration, list_configurations, set_active};
pub use fetch::{FetchKind, FetchOutcome, fetch_items, fetch_ledgers, normalize_names};
pub use rpc::{DeskError, RemoteCall, RpcResponse};
