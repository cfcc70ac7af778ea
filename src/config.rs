use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tokio::runtime::Builder;

use crate::runner::MigrationRange;

/// Main entrypoint to `migrator`.
pub fn run() -> eyre::Result<()> {
    let config = Config::parse();
    config.command.run()
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Config {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(name = "migrate")]
    Migrate(Migrate),
    #[command(name = "list")]
    List,
}

impl Commands {
    pub fn run(&self) -> eyre::Result<()> {
        match self {
            Commands::Migrate(command) => command.run(),
            Commands::List => crate::list(),
        }
    }
}

/// Run the project's migrations against a network.
#[derive(Parser, Debug)]
pub struct Migrate {
    /// Directory holding the compiled contract artifacts.
    #[arg(long, default_value = "build/contracts")]
    pub build_dir: PathBuf,
    /// Name of the network being migrated, passed on to every migration.
    #[arg(long, default_value = "development")]
    pub network: String,
    /// JSON-RPC endpoint of the network.
    #[arg(short = 'e', long, default_value = "http://localhost:8545")]
    pub endpoint: String,
    /// Run migrations starting at this number.
    #[arg(long = "from")]
    pub from: Option<u32>,
    /// Stop after the migration with this number.
    #[arg(long = "to")]
    pub to: Option<u32>,
    #[command(flatten)]
    pub auth: PrivateKey,
}

impl Migrate {
    pub fn run(&self) -> eyre::Result<()> {
        let runtime = Builder::new_multi_thread().enable_all().build()?;
        runtime.block_on(crate::migrate(self))
    }

    pub fn range(&self) -> MigrationRange {
        MigrationRange {
            from: self.from,
            to: self.to,
        }
    }
}

/// Credentials to sign deployments with. Without any, the node's unlocked
/// accounts are used.
#[derive(Args, Clone, Debug, Default)]
pub struct PrivateKey {
    /// File path to a text file containing a hex-encoded private key.
    #[arg(long, conflicts_with = "keystore_path")]
    pub private_key_path: Option<PathBuf>,
    /// Private key as a hex string. Warning: this exposes your key to shell
    /// history.
    #[arg(long, conflicts_with_all = ["private_key_path", "keystore_path"])]
    pub private_key: Option<String>,
    /// Path to an encrypted JSON keystore file.
    #[arg(long)]
    pub keystore_path: Option<PathBuf>,
    /// Keystore password file.
    #[arg(long, requires = "keystore_path")]
    pub keystore_password_path: Option<PathBuf>,
}
