use clap::Parser;
use parts_search_client::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Search(args) => cli::search::run(args, cli.api_url).await,
        Command::Availability(args) => cli::availability::run(args, cli.api_url).await,
        Command::Shell => cli::shell::run(cli.api_url).await,
    }
}
