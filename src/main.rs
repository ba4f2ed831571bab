use anyhow::Context;
use clap::Parser;
use lifeos::cli::{self, Cli};
use lifeos::config::Config;
use lifeos::db::Database;
use lifeos::logging;
use lifeos::store::Store;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env(cli.db.clone())?;
    logging::init(&config.log_filter);

    let db = Database::open_at(&config.db_path)
        .with_context(|| format!("opening {}", config.db_path.display()))?;
    let mut store = Store::open(db)?;

    cli::run(&mut store, &config, cli.command)?;

    store.close()?;
    Ok(())
}
