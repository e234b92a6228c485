use anyhow::Result;
use clap::Parser;
use pwstrength::cli::TrainCli;

fn main() -> Result<()> {
    pwstrength::init_tracing()?;

    let cli = TrainCli::parse();
    cli.run()
}
