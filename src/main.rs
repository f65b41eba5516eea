use clap::Parser;
use shelfkit::cli::{run, Cli};
use shelfkit::{init_logging, BUILD_DATE, VERSION};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    init_logging(level)?;
    tracing::debug!("shelfkit {} built {}", VERSION, BUILD_DATE);

    run(&cli)
}
