use std::io;

use anyhow::Context;
use asset_allocation::{
    compute_strategy, config::Settings, portfolio::Holdings, strategy::allocation_table,
};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

mod cli;

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let opts = cli::Cli::parse();
    init_logging(opts.verbose);

    if let Some(shell) = opts.completions {
        clap_complete::generate(
            shell,
            &mut cli::Cli::command(),
            env!("CARGO_BIN_NAME"),
            &mut io::stdout(),
        );
        return Ok(());
    }
    let Some(positions) = opts.positions else {
        anyhow::bail!("No positions file given");
    };

    let settings = Settings::load(opts.config.as_deref())?;
    let holdings = Holdings::load_from_file(&positions, opts.provider)
        .with_context(|| format!("Failed to load balances from {}", positions.display()))?;
    let (policy, invest) = settings
        .resolve(opts.policy, opts.invest.as_deref(), &holdings)
        .with_context(|| {
            format!(
                "Invalid --invest value {:?}",
                opts.invest.as_deref().unwrap_or_default()
            )
        })?;

    let allocation = policy.allocation();
    println!("Allocation policy {policy}");
    println!(
        " - Bonds {:.1}%, International Index {:.1}%, National Index {:.1}%",
        allocation.bonds * 100.0,
        allocation.international * 100.0,
        allocation.national * 100.0
    );
    println!();

    let strategy = compute_strategy(&holdings.balances, invest, policy);
    if opts.table {
        println!("{}", allocation_table(&holdings, &strategy));
        println!();
    }
    print!("{strategy}");
    Ok(())
}
