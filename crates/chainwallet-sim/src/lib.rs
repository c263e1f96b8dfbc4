//! chainwallet-sim — a simulated injected wallet.
//!
//! [`SimulatedWallet`] implements [`Eip1193Provider`](chainwallet_core::Eip1193Provider)
//! over in-memory state: a set of chains the wallet knows, an active chain,
//! granted accounts, and a per-method approval policy. Switching emits
//! `chainChanged`; account changes and revocation emit `accountsChanged`.
//!
//! # Quick start
//! ```rust,no_run
//! use std::sync::Arc;
//! use chainwallet_core::{Eip1193Provider, WalletConfig, WalletSession};
//! use chainwallet_sim::SimulatedWallet;
//!
//! let wallet = SimulatedWallet::builder().accounts(["0xabc"]).chain("0x1").build();
//! let provider: Arc<dyn Eip1193Provider> = wallet;
//! let session = WalletSession::new(Some(provider), WalletConfig::default());
//! ```

pub mod wallet;

pub use wallet::{SimulatedWallet, WalletBuilder};
