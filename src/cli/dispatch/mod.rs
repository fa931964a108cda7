//! Map validated CLI arguments to an [`Action`].

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{ARG_BCRYPT_COST, ARG_DSN, ARG_PORT};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(4000);
    let dsn = matches
        .get_one::<String>(ARG_DSN)
        .cloned()
        .context("missing required argument: --dsn")?;
    let bcrypt_cost = matches
        .get_one::<u32>(ARG_BCRYPT_COST)
        .copied()
        .unwrap_or(crate::accounts::Bcrypt::DEFAULT_COST);

    Ok(Action::Server(Args {
        port,
        dsn: SecretString::from(dsn),
        bcrypt_cost,
    }))
}
