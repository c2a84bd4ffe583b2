//! Shell completion generation.

use std::io;

use anyhow::{Context, Result};
use clap::ArgMatches;
use clap_complete::{generate, Shell};

pub fn execute(matches: &ArgMatches, mut cli: clap::Command) -> Result<()> {
    let shell = matches
        .get_one::<Shell>("shell")
        .copied()
        .context("shell name required")?;
    generate(shell, &mut cli, "vitals", &mut io::stdout());
    Ok(())
}
