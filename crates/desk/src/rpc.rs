use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeskError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Envelope returned by a server method. `message` may be a single value, a
/// list, or absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub message: Option<JsonValue>,
}

impl RpcResponse {
    pub fn new(message: impl Into<JsonValue>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// Server RPC seam (`call(method, args)`).
///
/// Implementations own the request lifecycle: timeouts, retries and
/// cancellation happen behind this trait.
pub trait RemoteCall {
    fn call(&self, method: &str, args: JsonValue) -> Result<RpcResponse, DeskError>;
}

impl<T: RemoteCall + ?Sized> RemoteCall for &T {
    fn call(&self, method: &str, args: JsonValue) -> Result<RpcResponse, DeskError> {
        (**self).call(method, args)
    }
}
