use anyhow::Result;
use clap::Parser;
use pwstrength::cli::ClassifyCli;

fn main() -> Result<()> {
    pwstrength::init_tracing()?;

    let cli = ClassifyCli::parse();
    cli.run()
}
