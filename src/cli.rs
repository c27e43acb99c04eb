//! Command line interface definition using clap.
//!
//! The binary inspects a step configuration: it lists the resolved account
//! slots, prints the fixture plan and checks that a simulated ledger can be
//! built from the file.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Inspect and validate ledger step configurations.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file.
    ///
    /// Falls back to `LEDGER_STEPS_CONFIG`, then `ledger-steps.json`.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Enable verbose logging output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand to execute; defaults to `check` when omitted.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Fill in the default subcommand.
    #[must_use]
    pub fn with_default_command(mut self) -> Self {
        if self.command.is_none() {
            self.command = Some(Commands::Check);
        }
        self
    }
}

/// Available top-level commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// List configured account slots with their ids and public keys.
    Accounts,
    /// List fixture plans and their actions.
    Fixtures,
    /// Validate the configuration and build a simulated ledger from it.
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&["ledger-steps"], None, Commands::Check)]
    #[case(&["ledger-steps", "accounts"], None, Commands::Accounts)]
    #[case(&["ledger-steps", "-c", "cfg.json", "fixtures"], Some("cfg.json"), Commands::Fixtures)]
    fn parses_arguments(
        #[case] argv: &[&str],
        #[case] config: Option<&str>,
        #[case] command: Commands,
    ) {
        let parsed = Cli::try_parse_from(argv).map(Cli::with_default_command);
        let Ok(cli) = parsed else {
            panic!("arguments should parse: {argv:?}");
        };
        assert_eq!(cli.config.as_deref().map(|p| p.as_str()), config);
        assert_eq!(cli.command, Some(command));
    }

    #[test]
    fn rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["ledger-steps", "deploy"]).is_err());
    }
}
