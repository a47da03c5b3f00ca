//! Command-line interface.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::BotConfig;

#[derive(Parser, Debug)]
#[command(name = "relay-bot", about = "Conversational Telegram relay", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the bot in webhook mode.
    Run {
        /// Bot token; falls back to the BOT_TOKEN environment variable.
        #[arg(long)]
        token: Option<String>,
    },
}

/// Loads and validates the configuration for the given CLI invocation.
pub fn load_config(command: &Commands) -> Result<BotConfig> {
    match command {
        Commands::Run { token } => {
            let config = BotConfig::load(token.clone())?;
            config.validate()?;
            Ok(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_accepts_token_flag() {
        let cli = Cli::parse_from(["relay-bot", "run", "--token", "123:abc"]);
        let Commands::Run { token } = cli.command;
        assert_eq!(token.as_deref(), Some("123:abc"));
    }
}
