//! chainwallet CLI — inspect supported chains and exercise the wallet session.
//!
//! # Commands
//! ```text
//! chainwallet chains
//! chainwallet describe 0x138de
//! chainwallet simulate --target 0x89 --wallet-chains 0x1 --transfer
//! chainwallet simulate --reject wallet_addEthereumChain
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cmd_chains;
mod cmd_simulate;
mod logging;

use logging::{init_tracing, LogConfig};

const DEMO_ACCOUNTS: [&str; 2] = [
    "0x1234567890abcdef1234567890abcdef12345678",
    "0xef01ef01ef01ef01ef01ef01ef01ef01ef01ef01",
];

#[derive(Parser)]
#[command(
    name = "chainwallet",
    about = "Connect, switch and add chains against an EIP-1193 wallet",
    version
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the supported chains
    Chains,

    /// Print the wallet_addEthereumChain parameters for a chain
    Describe {
        /// Chain id, e.g. 0x138de
        chain_id: String,
    },

    /// Connect to a simulated wallet and switch chains
    Simulate {
        /// Accounts the wallet grants (comma separated)
        #[arg(long, value_delimiter = ',', default_values = DEMO_ACCOUNTS)]
        accounts: Vec<String>,
        /// The wallet's active chain
        #[arg(long, default_value = "0x1")]
        chain: String,
        /// Additional chains the wallet already knows (comma separated)
        #[arg(long, value_delimiter = ',')]
        wallet_chains: Vec<String>,
        /// Chain to switch to
        #[arg(long, default_value = "0x138de")]
        target: String,
        /// Make the user reject this method (repeatable)
        #[arg(long)]
        reject: Vec<String>,
        /// Wallet switches to a chain as soon as it is added
        #[arg(long)]
        switch_on_add: bool,
        /// Also send the demo transfer
        #[arg(long)]
        transfer: bool,
        /// Wallet config JSON file
        #[arg(long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    init_tracing(&LogConfig {
        level: level.to_string(),
        json: cli.json_logs,
    });

    match cli.command {
        Commands::Chains => {
            cmd_chains::list();
            Ok(())
        }

        Commands::Describe { chain_id } => cmd_chains::describe(&chain_id),

        Commands::Simulate {
            accounts,
            chain,
            wallet_chains,
            target,
            reject,
            switch_on_add,
            transfer,
            config,
        } => {
            cmd_simulate::run(cmd_simulate::SimulateArgs {
                accounts,
                chain,
                wallet_chains,
                target,
                reject,
                switch_on_add,
                transfer,
                config,
            })
            .await
        }
    }
}
