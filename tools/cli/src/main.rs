//! OPVault CLI - decrypt and list the login items of an OPVault.
//!
//! This is a read-only tool: it opens the vault with the given
//! passphrase, verifies every integrity tag, and prints the decrypted
//! accounts. Nothing is ever written back.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use opvault_vault::open_vault;

#[derive(Parser)]
#[command(name = "opvault")]
#[command(about = "OPVault - read-only vault decryption")]
#[command(version)]
struct Cli {
    /// Path to the vault directory (containing `default/`).
    path: PathBuf,

    /// Vault passphrase. Prompted for when not given.
    #[arg(short = 'P', long)]
    password: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let password = match cli.password {
        Some(password) => password,
        None => rpassword::prompt_password("Vault password: ")
            .context("Failed to read password")?,
    };

    info!(path = %cli.path.display(), "Opening vault");

    let vault = open_vault(&cli.path, &password)
        .context("Failed to open vault (wrong password or corrupted vault)")?;

    for (index, account) in vault.accounts.iter().enumerate() {
        println!(
            "{}: {}, {} {}, {}, {}, {}, {}",
            index + 1,
            account.id,
            account.name,
            account.username,
            account.password,
            account.url,
            account.note,
            account.folder.name(),
        );
    }

    Ok(())
}
