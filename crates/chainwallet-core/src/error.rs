//! Wallet session error types.

use thiserror::Error;
use tracing::Level;

use crate::request::ProviderRpcError;

/// Errors that can occur while driving an injected wallet.
#[derive(Debug, Error)]
pub enum WalletError {
    /// No injected provider is present.
    #[error("no wallet provider available")]
    ProviderUnavailable,

    /// The operation requires a connected account.
    #[error("wallet is not connected")]
    NotConnected,

    /// The user declined the request in the wallet.
    #[error("user rejected {method}")]
    UserRejected { method: String },

    /// The wallet does not know the chain (code 4902). Recoverable by adding it.
    #[error("chain {chain_id} has not been added to the wallet")]
    ChainNotFound { chain_id: String },

    /// The chain has no registry entry, so it cannot be added.
    #[error("unknown chain id {chain_id}")]
    UnknownChain { chain_id: String },

    /// Any other provider-reported failure.
    #[error("{method} failed: {error}")]
    RequestFailed {
        method: String,
        error: ProviderRpcError,
    },

    /// The provider replied with something that does not decode.
    #[error("invalid response to {method}: {source}")]
    InvalidResponse {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    /// Request parameters could not be encoded.
    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    /// An event payload did not have the expected shape.
    #[error("invalid '{event}' payload: {reason}")]
    InvalidEvent { event: String, reason: String },
}

impl WalletError {
    /// Classify a provider rejection of `method`.
    ///
    /// `chain_id` is the switch target, used when the wallet reports 4902.
    pub fn from_provider(method: &str, chain_id: Option<&str>, error: ProviderRpcError) -> Self {
        if error.is_user_rejection() {
            return Self::UserRejected {
                method: method.to_string(),
            };
        }
        match chain_id {
            Some(chain_id) if error.is_unrecognized_chain() => Self::ChainNotFound {
                chain_id: chain_id.to_string(),
            },
            _ => Self::RequestFailed {
                method: method.to_string(),
                error,
            },
        }
    }

    /// Returns `true` if the user declined the request.
    pub fn is_user_rejection(&self) -> bool {
        matches!(self, Self::UserRejected { .. })
    }

    /// Returns `true` if the add-then-switch recovery applies.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ChainNotFound { .. })
    }

    /// The provider error code behind this error, if any.
    pub fn code(&self) -> Option<i64> {
        match self {
            Self::UserRejected { .. } => Some(crate::request::codes::USER_REJECTED),
            Self::ChainNotFound { .. } => Some(crate::request::codes::UNRECOGNIZED_CHAIN),
            Self::RequestFailed { error, .. } => Some(error.effective_code()),
            _ => None,
        }
    }
}

/// Level a failed operation is logged at once it is returned to the caller.
///
/// A `ChainNotFound` that reaches the caller has already used its one retry,
/// so it counts as a failure.
pub(crate) fn report_level(err: &WalletError) -> Level {
    match err {
        WalletError::ProviderUnavailable | WalletError::NotConnected => Level::DEBUG,
        WalletError::UserRejected { .. } => Level::WARN,
        _ => Level::ERROR,
    }
}

/// Log a failed operation. Rejections are expected user behaviour, not faults.
pub(crate) fn report(operation: &'static str, err: &WalletError) {
    let level = report_level(err);
    if level == Level::DEBUG {
        tracing::debug!(operation, error = %err, "skipped")
    } else if level == Level::WARN {
        tracing::warn!(operation, error = %err, "request declined")
    } else {
        tracing::error!(operation, error = %err, code = ?err.code(), "request failed")
    }
}
