//! Command-line arguments. With `--route` the runner executes once and
//! exits; without it the interactive menu loops.

use clap::{crate_version, Parser};

#[derive(Debug, Parser)]
#[clap(
    name = "ferry",
    about = "Route-driven cross-chain transfer runner",
    version = crate_version!()
)]
pub struct Cli {
    #[clap(
        long,
        short = 'r',
        help = "Menu route id (1-9) to run non-interactively"
    )]
    pub route: Option<u8>,

    #[clap(
        long,
        short = 'n',
        default_value_t = 1,
        help = "Transfers per wallet"
    )]
    pub count: u32,

    #[clap(long, help = "Block on the transfer indexer after each confirmation")]
    pub verify_indexing: bool,
}
