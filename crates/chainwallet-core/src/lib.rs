//! chainwallet-core — session logic for an injected EIP-1193 wallet.
//!
//! # Overview
//!
//! The host application hands this crate the provider it found (or `None`)
//! and drives the session through [`WalletSession`]. The crate defines:
//!
//! - [`Eip1193Provider`] — the injected wallet capability
//! - [`ConnectionManager`] — owns the [`SessionState`] and its transitions
//! - [`EventSubscriptionManager`] — balanced `accountsChanged` / `chainChanged` listeners
//! - [`ChainSwitchOrchestrator`] — switch, or add-then-switch on code 4902
//! - [`ChainRegistry`] — the three supported chain descriptors
//! - [`WalletError`] — structured error type

pub mod chains;
pub mod config;
pub mod connection;
pub mod error;
pub mod events;
pub mod provider;
pub mod request;
pub mod session;
pub mod state;
pub mod switch;
pub mod transfer;

pub use chains::{ChainDescriptor, ChainRegistry, NativeCurrency, UNKNOWN_CHAIN};
pub use config::{TransferConfig, WalletConfig};
pub use connection::ConnectionManager;
pub use error::WalletError;
pub use events::{EventSubscriptionManager, ProviderEvent};
pub use provider::{Eip1193Provider, Listener, ListenerId};
pub use request::{ProviderRequest, ProviderRpcError};
pub use session::WalletSession;
pub use state::{truncate_address, ConnectionState, SessionState};
pub use switch::{ChainSwitchOrchestrator, SwitchOutcome};
pub use transfer::{DemoTransfer, TransactionRequest};
