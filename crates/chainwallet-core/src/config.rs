//! Session configuration.

use serde::{Deserialize, Serialize};

/// Recipient of the demonstration transfer.
pub const DEFAULT_TRANSFER_TO: &str = "0x2E15bB8aDF3438F66A6F786679B0bBBBF02A75d5";
/// 0.001 ether in wei, hex encoded.
pub const DEFAULT_TRANSFER_VALUE: &str = "0x38d7ea4c68000";

/// The fixed value transfer offered once connected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferConfig {
    #[serde(default = "default_to")]
    pub to: String,
    /// Amount in wei as a `0x`-prefixed hex quantity.
    #[serde(default = "default_value")]
    pub value: String,
}

fn default_to() -> String {
    DEFAULT_TRANSFER_TO.into()
}

fn default_value() -> String {
    DEFAULT_TRANSFER_VALUE.into()
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            to: default_to(),
            value: default_value(),
        }
    }
}

/// Configuration for a [`WalletSession`](crate::session::WalletSession).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletConfig {
    #[serde(default)]
    pub transfer: TransferConfig,
}

impl WalletConfig {
    /// Load from a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = WalletConfig::from_json("{}").unwrap();
        assert_eq!(cfg, WalletConfig::default());
        assert_eq!(cfg.transfer.value, "0x38d7ea4c68000");
    }

    #[test]
    fn partial_override() {
        let cfg = WalletConfig::from_json(r#"{"transfer":{"value":"0x1"}}"#).unwrap();
        assert_eq!(cfg.transfer.value, "0x1");
        assert_eq!(cfg.transfer.to, DEFAULT_TRANSFER_TO);
    }
}
