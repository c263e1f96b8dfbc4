//! `chainwallet simulate` — run a session against the simulated wallet.

use std::sync::Arc;

use anyhow::{Context, Result};
use chainwallet_core::{truncate_address, Eip1193Provider, WalletConfig, WalletSession};
use chainwallet_sim::SimulatedWallet;

pub struct SimulateArgs {
    pub accounts: Vec<String>,
    pub chain: String,
    pub wallet_chains: Vec<String>,
    pub target: String,
    pub reject: Vec<String>,
    pub switch_on_add: bool,
    pub transfer: bool,
    pub config: Option<String>,
}

pub async fn run(args: SimulateArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
            WalletConfig::from_json(&raw).with_context(|| format!("parsing {path}"))?
        }
        None => WalletConfig::default(),
    };

    let mut builder = SimulatedWallet::builder()
        .accounts(args.accounts)
        .chain(&args.chain)
        .known_chains(args.wallet_chains)
        .switch_on_add(args.switch_on_add);
    for method in args.reject {
        builder = builder.reject(method);
    }
    let wallet = builder.build();
    let provider: Arc<dyn Eip1193Provider> = wallet.clone();
    let session = WalletSession::new(Some(provider), config);

    println!("Connecting to {} wallet...", wallet.name());
    match session.connect().await {
        Ok(state) if state.is_connected() => {
            let conn = session.connection();
            println!("  Account: {}", conn.display_account());
            println!("  Chain:   {} ({})", conn.chain_name(), conn.chain_id().unwrap_or_default());
        }
        Ok(_) => {
            println!("  Wallet returned no accounts");
            return Ok(());
        }
        Err(e) => {
            println!("  Connect failed: {e}");
            return Ok(());
        }
    }

    println!("\nSwitching to {}...", session.connection().registry().display_name(&args.target));
    match session.switch_chain(&args.target).await {
        Ok(outcome) => println!("  Outcome: {outcome}"),
        Err(e) => println!("  Switch failed: {e}"),
    }
    let conn = session.connection();
    println!("  Chain:   {} ({})", conn.chain_name(), conn.chain_id().unwrap_or_default());

    if args.transfer {
        println!("\nSending demo transfer...");
        match session.send_demo_transfer().await {
            Ok(hash) => println!("  Tx hash: {}", truncate_address(&hash)),
            Err(e) => println!("  Transfer failed: {e}"),
        }
    }

    session.disconnect();
    println!("\nDisconnected. Wallet received {} requests:", wallet.requests().len());
    for method in wallet.methods() {
        println!("  - {method}");
    }
    Ok(())
}
