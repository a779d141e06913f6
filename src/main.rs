//! CLI entry point for codenour

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "codenour")]
#[command(version)]
#[command(about = "Renders the CODENOUR news and games feeds", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render both feeds into the output page
    #[command(alias = "r")]
    Render {
        /// Write here instead of the configured output
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Re-render when content changes
        #[arg(short, long)]
        watch: bool,
    },

    /// Open a game's detail view and print it
    Show {
        /// Document path relative to the games directory
        document: String,
    },

    /// Print the card excerpt of a document
    Preview {
        /// Document path relative to the feed directory
        document: String,

        /// Feed the document belongs to (news, games)
        #[arg(short, long, default_value = "games")]
        feed: String,
    },

    /// List a feed's manifest entries
    List {
        /// Feed to list (news, games)
        #[arg(default_value = "news")]
        feed: String,
    },

    /// Delete the rendered page
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "codenour=debug,info"
    } else {
        "codenour=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Render { output, watch } => {
            let app = codenour::Codenour::new(&base_dir)?;
            if watch {
                codenour::commands::render::watch(&app, output.as_deref()).await?;
            } else {
                tracing::info!("Rendering feeds...");
                codenour::commands::render::run(&app, output.as_deref()).await?;
                println!("Rendered successfully!");
            }
        }

        Commands::Show { document } => {
            let app = codenour::Codenour::new(&base_dir)?;
            codenour::commands::show::run(&app, &document).await?;
        }

        Commands::Preview { document, feed } => {
            let app = codenour::Codenour::new(&base_dir)?;
            codenour::commands::preview::run(&app, &feed, &document).await?;
        }

        Commands::List { feed } => {
            let app = codenour::Codenour::new(&base_dir)?;
            codenour::commands::list::run(&app, &feed).await?;
        }

        Commands::Clean => {
            let app = codenour::Codenour::new(&base_dir)?;
            tracing::info!("Cleaning rendered output...");
            app.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("codenour version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
