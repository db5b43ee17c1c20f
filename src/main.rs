//! CLI entry point for blogweave

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blogweave")]
#[command(version)]
#[command(about = "A static blog generator for Markdown with embedded components", long_about = None)]
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
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post or page
    New {
        /// Layout to use (post, page, or any custom post layout)
        #[arg(short, long, default_value = "post")]
        layout: String,

        /// Title of the new post
        title: String,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate {
        /// Regenerate whenever content, templates or settings change
        #[arg(short, long)]
        watch: bool,
    },

    /// Convert posts and pages into component source pages
    Convert,

    /// Remove generated HTML, components and the feed
    Clean,

    /// List site content
    List {
        /// Type of content to list (post, page, component)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        "blogweave=debug,info"
    } else {
        "blogweave=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            blogweave::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New { layout, title } => {
            let site = blogweave::Site::new(&base_dir)?;
            tracing::info!("Creating new {} with title: {}", layout, title);
            let path = site.new_post(&title, &layout)?;
            println!("Created {:?}", path);
        }

        Commands::Generate { watch } => {
            let site = blogweave::Site::new(&base_dir)?;
            tracing::info!("Generating static files...");

            site.generate()?;
            println!("Generated successfully!");

            if watch {
                tracing::info!("Watching for file changes...");
                blogweave::commands::generate::watch(&site).await?;
            }
        }

        Commands::Convert => {
            let site = blogweave::Site::new(&base_dir)?;
            tracing::info!("Converting content...");
            site.convert()?;
            println!("Converted successfully!");
        }

        Commands::Clean => {
            let site = blogweave::Site::new(&base_dir)?;
            tracing::info!("Cleaning generated output...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let site = blogweave::Site::new(&base_dir)?;
            blogweave::commands::list::run(&site, &r#type)?;
        }

        Commands::Version => {
            println!("blogweave version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
