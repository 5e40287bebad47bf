use clap::Parser;

use multibox_bridge::cli::Cli;
use multibox_bridge::{app, util};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = util::init_tracing(&cli.log_file())?;
    util::install_panic_hook();

    let config = cli.resolve_config()?;
    tracing::info!(?config, "multibox bridge starting");

    app::run(config).await
}
