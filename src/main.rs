use anyhow::Result;
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bank_ledger::banking::{AccountStore, AccountsRepository, RegistrationRules};
use bank_ledger::cli;
use bank_ledger::config::Args;
use bank_ledger::io::{InMemoryAccountsRepository, JsonFileAccountsRepository};

#[tokio::main]
async fn main() -> Result<()> {
  init_tracing();

  let args = Args::parse();
  let rules = args.registration_rules();

  if args.ephemeral {
    info!("Accounts are kept in memory only");
    run(InMemoryAccountsRepository::new(), rules).await
  } else {
    let repository = JsonFileAccountsRepository::new(args.data_file);
    info!(path = %repository.path().display(), "Using accounts file");
    run(repository, rules).await
  }
}

async fn run<R>(repository: R, rules: RegistrationRules) -> Result<()>
where
  R: AccountsRepository,
{
  let mut store = AccountStore::open(repository, rules).await?;
  cli::menu::run(
    BufReader::new(tokio::io::stdin()),
    tokio::io::stdout(),
    &mut store,
  )
  .await
}

/// Logs go to stderr so they don't get mixed with the console, `RUST_LOG` controls the level (warnings by default).
fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .init();
}
