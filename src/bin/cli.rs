// src/bin/cli.rs
use clap::Parser;
use market_enrich::{cli, log};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = cli::Args::parse();
    log::init(args.verbose);

    if let Err(e) = cli::run(&args) {
        market_enrich::loge!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    Ok(())
}
