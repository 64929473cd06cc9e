mod cmd;
mod config;
mod context;
mod domain;
mod error;
mod infra;
mod render;
mod services;
mod workflow;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::cmd::generate::{self, GenerateArgs};
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::git::GitCli;
use crate::infra::github::GithubClient;

#[derive(Parser)]
#[command(
    name = "changelog",
    author,
    version,
    about = "Generate a changelog from per-change fragment files"
)]
struct Cli {
    /// Log debug details (resolved commits, API requests) to stderr.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the generated changelog markdown to stdout.
    Generate(GenerateArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(error) = run(cli).await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("changelog={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> AppResult<()> {
    match cli.command {
        Commands::Generate(args) => run_generate(args).await,
    }
}

async fn run_generate(args: GenerateArgs) -> AppResult<()> {
    let config = AppConfig::load(&args)?;
    tracing::debug!(
        api_repo = %config.api_repo,
        issue_repo = %config.issue_repo,
        strategy = ?config.strategy,
        "generate options"
    );

    let git = Arc::new(GitCli::new(config.repo_path.clone()));
    let platform = Arc::new(GithubClient::new(
        config.github_api_url.clone(),
        config.github_token.clone(),
    ));
    let context = AppContext::new(config, git, platform);

    let changelog = generate::run(&context, args.format).await?;
    print!("{changelog}");

    Ok(())
}
