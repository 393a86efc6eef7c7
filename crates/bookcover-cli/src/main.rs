use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use bookcover_core::DEFAULT_GENRE;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "bookcover", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the config file (default: ~/.config/bookcover/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Resolve a cover image URL for a book
    ///
    /// Asks Google Books first, then Open Library. Each source is tried
    /// with the title and author, then with the title alone. When neither
    /// has a cover, a genre-coloured placeholder URL is printed instead,
    /// so this command always prints a usable URL.
    Resolve {
        /// Book title
        #[arg(long)]
        title: String,

        /// Book author
        #[arg(long, default_value = "")]
        author: String,

        /// Genre, used to colour the placeholder
        #[arg(long, default_value = DEFAULT_GENRE)]
        genre: String,

        /// Give up on the sources after this many seconds
        #[arg(long)]
        deadline_secs: Option<u64>,

        /// Also print which source the URL came from
        #[arg(short, long)]
        verbose: bool,
    },
    /// Print the offline placeholder URL for a book
    Placeholder {
        /// Book title
        #[arg(long)]
        title: String,

        /// Genre, used to colour the placeholder
        #[arg(long, default_value = DEFAULT_GENRE)]
        genre: String,
    },
    /// Resolve covers for every book in a JSON catalogue
    ///
    /// The file holds an array of objects with `title`, and optionally
    /// `author` and `genre`. Books are resolved one at a time and the
    /// results are printed as a JSON array.
    Batch {
        /// Path to the JSON catalogue
        path: PathBuf,
    },
    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Debug, clap::Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Create the config file with commented defaults
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config;

    match cli.command {
        Commands::Resolve {
            title,
            author,
            genre,
            deadline_secs,
            verbose,
        } => {
            let config = commands::load_config(config_path.as_deref())?;
            commands::run_resolve(&config, title, author, genre, deadline_secs, verbose).await?;
        }
        Commands::Placeholder { title, genre } => {
            let config = commands::load_config(config_path.as_deref())?;
            commands::show_placeholder(&config, &title, &genre);
        }
        Commands::Batch { path } => {
            let config = commands::load_config(config_path.as_deref())?;
            commands::run_batch(&config, &path).await?;
        }
        Commands::Config(ConfigCommands::Show) => {
            commands::show_config(config_path.as_deref())?;
        }
        Commands::Config(ConfigCommands::Path) => {
            commands::show_config_path(config_path.as_deref());
        }
        Commands::Config(ConfigCommands::Init) => {
            commands::init_config()?;
        }
    }

    Ok(())
}
