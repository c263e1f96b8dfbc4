//! Chain registry — the fixed set of networks the session can switch to.
//!
//! Descriptors serialize with the EIP-3085 field names, so a descriptor can be
//! passed straight to `wallet_addEthereumChain`.

use serde::{Deserialize, Serialize};

use crate::error::WalletError;

/// Display name returned for identifiers the registry does not know.
pub const UNKNOWN_CHAIN: &str = "Unknown Chain";

pub const BERACHAIN: &str = "0x138de";
pub const ETHEREUM: &str = "0x1";
pub const POLYGON: &str = "0x89";

/// Native currency of a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Metadata needed to register a chain with a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDescriptor {
    pub chain_id: String,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub native_currency: NativeCurrency,
    pub block_explorer_urls: Vec<String>,
}

struct Entry {
    display_name: &'static str,
    descriptor: ChainDescriptor,
}

fn entry(
    chain_id: &str,
    display_name: &'static str,
    chain_name: &str,
    rpc_url: &str,
    currency: (&str, &str),
    explorer: &str,
) -> Entry {
    Entry {
        display_name,
        descriptor: ChainDescriptor {
            chain_id: chain_id.into(),
            chain_name: chain_name.into(),
            rpc_urls: vec![rpc_url.into()],
            native_currency: NativeCurrency {
                name: currency.0.into(),
                symbol: currency.1.into(),
                decimals: 18,
            },
            block_explorer_urls: vec![explorer.into()],
        },
    }
}

/// Static lookup of chain metadata by chain identifier.
pub struct ChainRegistry {
    entries: Vec<Entry>,
}

impl ChainRegistry {
    /// The three built-in chains: Berachain, Ethereum and Polygon.
    pub fn builtin() -> Self {
        Self {
            entries: vec![
                entry(
                    BERACHAIN,
                    "Berachain",
                    "Berachain",
                    "https://rpc.berachain.com",
                    ("Berachain", "BERA"),
                    "https://berascan.com",
                ),
                entry(
                    ETHEREUM,
                    "Ethereum",
                    "Ethereum Mainnet",
                    "https://mainnet.infura.io/v3/YOUR_INFURA_PROJECT_ID",
                    ("Ether", "ETH"),
                    "https://etherscan.io",
                ),
                entry(
                    POLYGON,
                    "Polygon",
                    "Polygon Mainnet",
                    "https://rpc-mainnet.maticvigil.com",
                    ("MATIC", "MATIC"),
                    "https://polygonscan.com",
                ),
            ],
        }
    }

    fn find(&self, chain_id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.descriptor.chain_id == chain_id)
    }

    /// Full descriptor for a known chain.
    pub fn describe(&self, chain_id: &str) -> Result<&ChainDescriptor, WalletError> {
        self.find(chain_id)
            .map(|e| &e.descriptor)
            .ok_or_else(|| WalletError::UnknownChain {
                chain_id: chain_id.to_string(),
            })
    }

    /// Human-readable name; [`UNKNOWN_CHAIN`] for anything not registered.
    pub fn display_name(&self, chain_id: &str) -> &'static str {
        self.find(chain_id).map_or(UNKNOWN_CHAIN, |e| e.display_name)
    }

    pub fn is_known(&self, chain_id: &str) -> bool {
        self.find(chain_id).is_some()
    }

    /// All descriptors in registration order.
    pub fn all(&self) -> impl Iterator<Item = &ChainDescriptor> {
        self.entries.iter().map(|e| &e.descriptor)
    }
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
