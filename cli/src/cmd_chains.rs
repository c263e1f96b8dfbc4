//! `chainwallet chains` and `chainwallet describe`.

use anyhow::Result;
use chainwallet_core::ChainRegistry;

pub fn list() {
    let registry = ChainRegistry::builtin();
    println!("Supported chains:\n");
    for chain in registry.all() {
        println!(
            "  {:<9} {:<10} {} ({})",
            chain.chain_id,
            registry.display_name(&chain.chain_id),
            chain.native_currency.symbol,
            chain.rpc_urls.first().map(String::as_str).unwrap_or("-"),
        );
    }
}

/// Print the `wallet_addEthereumChain` parameters for `chain_id`.
pub fn describe(chain_id: &str) -> Result<()> {
    let registry = ChainRegistry::builtin();
    let descriptor = registry.describe(chain_id)?;
    println!("{}", serde_json::to_string_pretty(descriptor)?);
    Ok(())
}
