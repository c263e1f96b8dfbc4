//! The `Eip1193Provider` trait — the injected wallet capability.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::WalletError;
use crate::request::{ProviderRequest, ProviderRpcError};

/// Handle returned by [`Eip1193Provider::on`], used to remove the listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// Callback invoked with the payload of a provider event.
pub type Listener = Arc<dyn Fn(&Value) + Send + Sync>;

/// An injected EIP-1193 provider.
///
/// The provider is owned by the host environment and outlives the session;
/// this crate only issues requests and registers listeners against it.
///
/// # Object Safety
/// The trait is object-safe and is stored as `Arc<dyn Eip1193Provider>`.
#[async_trait]
pub trait Eip1193Provider: Send + Sync + 'static {
    /// Issue a request and wait for the wallet's reply.
    ///
    /// May suspend indefinitely while the wallet shows an approval prompt.
    async fn request(&self, req: ProviderRequest) -> Result<Value, ProviderRpcError>;

    /// Register `listener` for the named event.
    fn on(&self, event: &str, listener: Listener) -> ListenerId;

    /// Remove a listener registered with [`on`](Self::on).
    ///
    /// Returns `false` if no such listener was registered.
    fn remove_listener(&self, event: &str, id: ListenerId) -> bool;

    /// Human-readable name of the wallet behind this provider.
    fn name(&self) -> &str {
        "injected"
    }
}

impl dyn Eip1193Provider {
    /// Convenience: issue `method` and deserialize the result.
    ///
    /// Provider failures are classified with [`WalletError::from_provider`].
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, WalletError> {
        let result = self
            .request(ProviderRequest::new(method, params))
            .await
            .map_err(|e| WalletError::from_provider(method, None, e))?;
        serde_json::from_value(result).map_err(|source| WalletError::InvalidResponse {
            method: method.to_string(),
            source,
        })
    }
}
