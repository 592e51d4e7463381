// github-radar: discover topical repositories, then harvest their activity.
//
// `discover` writes out/repo_list.csv and out/repo_catalog.csv;
// `enrich` reads the list and writes the five fact tables next to it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use github_radar::{GitHubError, RadarConfig, discovery, enrichment};
use log::info;

#[derive(Parser, Debug)]
#[command(version, about = "Discover GitHub repositories by topic and harvest activity facts")]
struct Cli {
    /// TOML configuration file; defaults apply to anything it omits
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Personal access token used as the bearer credential
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search the configured queries and write the identity list and catalog
    Discover {
        #[arg(short, long, value_name = "DIR", default_value = "out")]
        out_dir: PathBuf,
    },
    /// Look up every repository of the identity list and write the fact tables
    Enrich {
        /// Identity list with an owner,repo header [default: <out-dir>/repo_list.csv]
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        #[arg(short, long, value_name = "DIR", default_value = "out")]
        out_dir: PathBuf,

        /// Log failing repositories and keep going instead of aborting
        #[arg(long)]
        continue_on_error: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine; GITHUB_TOKEN may come from the environment.
    let _ = dotenvy::dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = RadarConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let token = cli
        .token
        .filter(|t| !t.trim().is_empty())
        .ok_or(GitHubError::AuthRequired)?;

    match cli.command {
        Command::Discover { out_dir } => {
            let client = discovery::build_client(&token, &config.api, &config.discovery)
                .context("building search client")?;
            let report = discovery::run(&client, &config.discovery, &out_dir)
                .await
                .context("repository discovery failed")?;
            info!("Discovered {} repositories", report.catalog.len());
        }
        Command::Enrich {
            input,
            out_dir,
            continue_on_error,
        } => {
            config.enrichment.continue_on_error |= continue_on_error;
            let input = input.unwrap_or_else(|| out_dir.join(&config.discovery.list_file));
            let client = enrichment::build_client(&token, &config.api, &config.enrichment)
                .context("building API client")?;
            let report = enrichment::run(&client, &config.enrichment, &input, &out_dir)
                .await
                .with_context(|| format!("enrichment of {} failed", input.display()))?;
            info!(
                "Enriched {} repositories ({} failed)",
                report.meta.len(),
                report.failures.len()
            );
        }
    }

    Ok(())
}
