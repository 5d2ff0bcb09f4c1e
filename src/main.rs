mod archive;
mod client;
mod dump;
mod ghost;
mod resource;
mod settings;
mod utils;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::Value;

use archive::ArchiveStore;
use client::HubSpotClient;
use settings::Settings;

#[derive(Parser)]
#[command(name = "hubspot2ghost", about = "Move a HubSpot blog into a Ghost import file")]
struct Cli {
    /// Config file with hub_id and api_key (default: ./hubspot.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the blogs of the portal
    Blogs,
    /// Fetch authors, topics, posts and comments into the archive
    Dump {
        #[arg(long, default_value = archive::DEFAULT_ROOT)]
        export_dir: PathBuf,
    },
    /// Convert the archive into a Ghost import file
    Ghost {
        #[arg(long, default_value = archive::DEFAULT_ROOT)]
        export_dir: PathBuf,
        #[arg(short, long, default_value = ghost::DEFAULT_OUTPUT)]
        output: PathBuf,
    },
}

fn connect(config: Option<&std::path::Path>) -> anyhow::Result<HubSpotClient> {
    let settings = Settings::load(config)?;
    Ok(match settings.endpoint {
        Some(endpoint) => HubSpotClient::with_endpoint(settings.hub_id, settings.api_key, endpoint),
        None => HubSpotClient::new(settings.hub_id, settings.api_key),
    })
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    match cli.command {
        Commands::Blogs => {
            let client = connect(cli.config.as_deref())?;
            let blogs = client.blogs().context("Failed to fetch blogs")?;
            let n = blogs.len();
            for blog in blogs {
                let id = blog.get("id").map(Value::to_string).unwrap_or_default();
                let name = blog.get("name").and_then(Value::as_str).unwrap_or("-");
                println!("{:>14}  {}", id, name);
            }
            println!("{} blogs", n);
        }
        Commands::Dump { export_dir } => {
            let client = connect(cli.config.as_deref())?;
            let stats = dump::run(&client, &ArchiveStore::new(export_dir))?;
            println!("{} records archived.", stats.total());
        }
        Commands::Ghost { export_dir, output } => {
            let report = ghost::run(&ArchiveStore::new(export_dir), &output)?;
            report.print();
        }
    }

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    Ok(())
}
