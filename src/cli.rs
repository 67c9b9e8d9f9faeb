use std::path::PathBuf;

use asset_allocation::{AllocationPolicy, portfolio::Provider};
use clap::Parser;
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(version, about = "Rebalance bonds, international and national index funds")]
pub(crate) struct Cli {
    #[arg(
        required_unless_present = "completions",
        help = "Current positions CSV downloaded from fidelity"
    )]
    pub positions: Option<PathBuf>,
    #[arg(
        short,
        long,
        allow_hyphen_values = true,
        help = "Amount of new money to invest"
    )]
    pub invest: Option<String>,
    #[arg(
        short,
        long,
        value_enum,
        help = "Target allocation, instead of guessing from the file name"
    )]
    pub policy: Option<AllocationPolicy>,
    #[arg(short, long, help = "Config file")]
    pub config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = Provider::Fidelity, help = "Investment provider")]
    pub provider: Provider,
    #[arg(short, long, help = "Also print the allocation table")]
    pub table: bool,
    #[arg(short, long, help = "Enable debug logging")]
    pub verbose: bool,
    #[arg(long, value_enum, value_name = "SHELL", help = "Print a shell completion script")]
    pub completions: Option<Shell>,
}
