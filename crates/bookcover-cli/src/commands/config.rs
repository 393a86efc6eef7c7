use anyhow::Result;
use std::path::{Path, PathBuf};

use bookcover_resolve::config::{self, Config};

/// Load configuration, from `path` when given.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn effective_path(path: Option<&Path>) -> PathBuf {
    path.map_or_else(config::config_file_path, Path::to_path_buf)
}

/// Show the current effective configuration.
pub fn show_config(path: Option<&Path>) -> Result<()> {
    let config = load_config(path)?;
    let config_path = effective_path(path);

    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config_path.display());
    let exists = config_path.exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    println!("Settings:");
    println!("  google_books_url: {}", config.google_books_url);
    println!("  open_library_url: {}", config.open_library_url);
    println!("  covers_url: {}", config.covers_url);
    println!("  placeholder_url: {}", config.placeholder_url);
    println!("  request_timeout_secs: {}", config.request_timeout_secs);
    println!("  attempt_delay_ms: {}", config.attempt_delay_ms);
    println!(
        "  deadline_secs: {}",
        config
            .deadline_secs
            .map_or_else(|| String::from("<not set>"), |secs| secs.to_string())
    );
    println!("  user_agent: {}", config.user_agent);

    println!("\nPriority: ENV vars (BOOKCOVER_*) > Config file > Defaults");

    Ok(())
}

/// Print the config file path.
pub fn show_config_path(path: Option<&Path>) {
    println!("{}", effective_path(path).display());
}

/// Create the config file if it does not exist yet.
pub fn init_config() -> Result<()> {
    let path = config::config_file_path();
    if config::ensure_config_file()? {
        println!("Created config file: {}", path.display());
    } else {
        println!("Config file already exists: {}", path.display());
    }
    Ok(())
}
