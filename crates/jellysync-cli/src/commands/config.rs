use crate::output::{Output, OutputFormat};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use media_sync_config::{Config, CredentialStore, PathManager, ServerConfig};
use owo_colors::OwoColorize;
use serde_json::json;
use std::path::Path;

pub fn show_config(config_file: &Path, paths: &PathManager, full: bool, output: &Output) -> Result<()> {
    let config_path = config_file.to_path_buf();
    if !config_path.exists() {
        output.warn(format!("Configuration file not found at: {}", config_path.display()));
        output.info("Defaults are shown below; pass servers with --jellyfin-url1/--jellyfin-url2 or create the file.");
    }

    let config = Config::load_or_default(&config_path)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_path.display(), e))?;

    let library_a = config.library_a.as_ref().map(|s| display_server(s, full));
    let library_b = config.library_b.as_ref().map(|s| display_server(s, full));

    match output.format() {
        OutputFormat::Human => {
            if output.is_quiet() {
                return Ok(());
            }

            println!("\n{}", "Configuration".bright_cyan().bold());
            println!("  {:<14} {}", "Config file".bold(), config_path.display());
            println!("  {:<14} {}", "Credentials".bold(), paths.credentials_file().display());
            println!("  {:<14} {}", "Logs".bold(), paths.log_dir().display());

            for (title, server) in [("[library_a]", &library_a), ("[library_b]", &library_b)] {
                println!("\n{}", title.bright_white().bold());
                match server {
                    Some(server) => print_server(server),
                    None => println!("  {}", "not configured".dimmed()),
                }
            }

            let kinds: Vec<&str> = config.sync.item_types.iter().map(|k| k.as_str()).collect();
            println!("\n{}", "[sync]".bright_white().bold());
            println!("  {:<14} {}", "page_size", config.sync.page_size);
            println!("  {:<14} {}", "item_types", kinds.join(", "));
            println!("  {:<14} {}", "log_to_file", config.sync.log_to_file);
            println!();
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            output.json(&json!({
                "config_file": config_path.display().to_string(),
                "library_a": library_a,
                "library_b": library_b,
                "sync": config.sync,
            }));
        }
    }

    Ok(())
}

fn display_server(server: &ServerConfig, full: bool) -> ServerConfig {
    if full {
        server.clone()
    } else {
        server.masked()
    }
}

fn print_server(server: &ServerConfig) {
    let password = if server.server_password.is_empty() {
        "(stored or not set)".dimmed().to_string()
    } else {
        server.server_password.clone()
    };
    println!("  {:<14} {}", "server_url", server.server_url);
    println!("  {:<14} {}", "server_user", server.server_username);
    println!("  {:<14} {}", "library_user", server.effective_username());
    println!("  {:<14} {}", "password", password);
}

/// Save a server password to the credentials file, prompting when not given
pub fn store_password(
    paths: &PathManager,
    url: &str,
    username: &str,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => rpassword::prompt_password(format!("Password for {} on {}: ", username, url))?,
    };
    if password.is_empty() {
        return Err(eyre!("Password cannot be empty"));
    }

    let credentials_file = paths.credentials_file();
    let mut store = CredentialStore::new(credentials_file.clone());
    store
        .load()
        .map_err(|e| eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;
    store.set_server_password(url, username, password);
    store
        .save()
        .map_err(|e| eyre!("Failed to save credentials to {}: {}", credentials_file.display(), e))?;

    output.success(format!("Stored password for {} on {}", username, url));
    Ok(())
}
