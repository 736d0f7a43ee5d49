//! Console runner for repeated cross-chain transfers.

mod args;
mod render;

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use colored::Colorize;
use tracing::{error, info, Level};

use ferry_config::{
    route, sepolia_random_pool, wallets_from_env, WalletCredential, INDEXER_GRAPHQL_URL,
};
use ferry_engine::{Engine, EngineOptions, RoutePlan, RunOptions};
use ferry_indexer::HttpIndexer;
use ferry_rpc::HttpChainClient;
use ferry_types::NetworkId;

/// Global transfer total for the all-chains random mode.
const FULL_RANDOM_TOTAL: u32 = 30;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let cli = args::Cli::parse();

    let wallets = match wallets_from_env() {
        Ok(wallets) => wallets,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    if wallets.is_empty() {
        error!("no wallets configured");
        print_env_help();
        std::process::exit(1);
    }
    print_wallet_summary(&wallets);

    let chain = Arc::new(HttpChainClient::new(None));
    let indexer = Arc::new(HttpIndexer::new(INDEXER_GRAPHQL_URL, None));
    let engine = match Engine::new(chain, indexer, EngineOptions::default()) {
        Ok(engine) => engine.with_event_handler(render::event_handler()),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Some(route_id) = cli.route {
        run_choice(&engine, &wallets, route_id, cli.count, cli.verify_indexing).await;
        return;
    }

    loop {
        print_menu();
        let choice = prompt("Select bridge route (0-9): ");
        if choice == "0" {
            info!("exiting");
            break;
        }
        let Ok(route_id) = choice.parse::<u8>() else {
            error!("invalid route selection");
            continue;
        };
        if !(1..=9).contains(&route_id) {
            error!("invalid route selection");
            continue;
        }

        let count = if route_id == 5 {
            1
        } else {
            prompt("Transfers per wallet [1]: ").parse().unwrap_or(1)
        };
        let verify_indexing =
            prompt("Verify bridge indexing? (y/n) [n]: ").eq_ignore_ascii_case("y");

        run_choice(&engine, &wallets, route_id, count, verify_indexing).await;
    }
}

async fn run_choice(
    engine: &Engine,
    wallets: &[WalletCredential],
    route_id: u8,
    count: u32,
    verify_indexing: bool,
) {
    let plan = match route_id {
        4 => RoutePlan::RandomFrom(sepolia_random_pool()),
        5 => RoutePlan::AnyToAny {
            total_transfers: FULL_RANDOM_TOTAL,
        },
        id => {
            if route(id).is_none() {
                error!("unknown route id {}", id);
                return;
            }
            RoutePlan::Fixed(id)
        }
    };
    let options = RunOptions {
        transfers_per_wallet: count,
        verify_indexing,
    };

    let started = Instant::now();
    match engine.run(wallets, &plan, &options).await {
        Ok(summary) => {
            let elapsed = started.elapsed().as_secs();
            info!(
                "{}/{} transfers confirmed in {}m {}s",
                summary.completed,
                summary.total,
                elapsed / 60,
                elapsed % 60
            );
        }
        Err(e) => error!("run aborted: {}", e),
    }
}

fn print_menu() {
    println!();
    println!("{}", "Standard routes:".yellow().bold());
    for id in [1u8, 2, 3] {
        println!("  {}. {}", id, route(id).unwrap().label);
    }
    println!("{}", "Random modes:".magenta().bold());
    println!("  4. Sepolia → random (Holesky/Babylon)");
    println!(
        "  5. All chains → random ({} transfers total)",
        FULL_RANDOM_TOTAL
    );
    println!("{}", "Special routes:".green().bold());
    for id in [6u8, 7, 8, 9] {
        println!("  {}. {}", id, route(id).unwrap().label);
    }
    println!("  0. Exit");
    println!();
}

fn print_wallet_summary(wallets: &[WalletCredential]) {
    info!("{} wallet(s) configured", wallets.len());
    for wallet in wallets {
        let mark = |network: NetworkId| {
            if wallet.destination_address(network).is_some() {
                "✓".green().to_string()
            } else {
                "✗".red().to_string()
            }
        };
        info!(
            "{}: {} | {} babylon | {} xion | {} osmosis",
            wallet.name,
            wallet.address,
            mark(NetworkId::Babylon),
            mark(NetworkId::Xion),
            mark(NetworkId::Osmosis),
        );
    }
}

fn print_env_help() {
    println!();
    println!("Configure wallets through the environment:");
    println!("  FERRY_KEY_1=0xYourSigningKey");
    println!("  FERRY_ADDRESS_1=0xYourEvmAddress");
    println!("  FERRY_BABYLON_ADDRESS_1=bbn1...   (routes 2, 7, 8)");
    println!("  FERRY_XION_ADDRESS_1=xion1...     (route 3)");
    println!("  FERRY_OSMO_ADDRESS_1=osmo1...     (route 8)");
    println!("  FERRY_SEI_ADDRESS_1=0x...         (optional, route 6)");
    println!("  FERRY_BNB_ADDRESS_1=0x...         (optional, route 9)");
    println!();
}

fn prompt(message: &str) -> String {
    print!("{}", message.cyan());
    let _ = io::stdout().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return String::new();
    }
    line.trim().to_string()
}
