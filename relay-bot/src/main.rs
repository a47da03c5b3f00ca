use clap::Parser;
use relay_bot::{load_config, run_bot, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = load_config(&cli.command)?;
    run_bot(config).await
}
