use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use kidsafe::{App, Config};
use kidsafe_router::{NavigationOutcome, ScrollTarget};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "kidsafe")]
#[command(version, about = "Kidsafe site router", long_about = None)]
struct Cli {
    /// Path to the configuration file (default: ./kidsafe.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the route table
    Routes,

    /// Mount the app and navigate to each URL in turn
    Visit {
        /// URLs to visit, e.g. /about#team
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Print the HTML of the view shown for a URL
    Render {
        url: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let app = App::new(config)?;

    match cli.command {
        Commands::Routes => {
            let registry = app.router.registry();
            println!("{} {} routes", "✓".green(), registry.len());
            for entry in registry.entries() {
                let loading = if entry.is_lazy() { "lazy" } else { "eager" };
                println!("  {:<24} {:<22} {}", entry.path(), entry.name, loading.dimmed());
            }
        }
        Commands::Visit { urls } => {
            report(&app.config.app.mount, &app.mount().await?);
            for url in &urls {
                report(url, &app.visit(url).await?);
            }
            println!("{} loaded: {}", "→".cyan(), app.router.loaded_views().await.join(", "));
            let stats = app.router.cache_stats().await;
            println!(
                "{} {} loads, {} hits, {} joins, {} failures",
                "→".cyan(),
                stats.loads,
                stats.hits,
                stats.joins,
                stats.failures
            );
        }
        Commands::Render { url } => {
            app.mount().await?;
            if let NavigationOutcome::NotFound { path } = app.visit(&url).await? {
                bail!("No route for {}", path);
            }
            if let Some(html) = app.render_current().await {
                println!("{}", html);
            }
        }
    }

    Ok(())
}

fn report(url: &str, outcome: &NavigationOutcome<kidsafe::ViewModule>) {
    match outcome {
        NavigationOutcome::Committed(navigation) => {
            let scroll = match &navigation.scroll {
                ScrollTarget::Element { id, behavior } => format!("#{} ({:?})", id, behavior),
                ScrollTarget::Position { position, behavior } => {
                    format!("({}, {}) ({:?})", position.left, position.top, behavior)
                }
            };
            println!(
                "{} {} -> {} [{}] scroll {}",
                "✓".green(),
                url,
                navigation.route.bold(),
                navigation.href,
                scroll
            );
        }
        NavigationOutcome::Superseded { path } => {
            println!("{} {} superseded", "•".yellow(), path);
        }
        NavigationOutcome::NotFound { path } => {
            println!("{} {} not found", "✗".red(), path);
        }
    }
}
