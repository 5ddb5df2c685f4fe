use anyhow::Result;
use clap::Parser as _;
use clean_duplicates::Args;

fn main() -> Result<()> {
    let args = Args::parse();
    clean_duplicates::run(args)
}
