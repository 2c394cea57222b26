use clap::{ArgAction, Parser, Subcommand};
use media_sync_config::{PathManager, SessionStamp};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "jellysync")]
#[command(about = "jellysync - Keep watch state in step between two Jellyfin libraries")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Config file to use instead of the default location
    #[arg(long = "config", global = true, value_name = "PATH")]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync played state, positions and favorites between two libraries
    #[command(long_about = "Snapshot both libraries, then push watch state from library 1 to library 2 and back. Flags override the values from the config file.")]
    Sync(SyncArgs),

    /// Inspect or update configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct SyncArgs {
    /// Write this session's log to <config>/logs/log_<timestamp>.txt as well
    #[arg(short, long, action = ArgAction::SetTrue)]
    log: bool,

    /// Items requested per page
    #[arg(long, value_name = "N")]
    page_size: Option<usize>,

    /// Library user for the first server (defaults to the login account)
    #[arg(long)]
    username1: Option<String>,

    /// URL of the first Jellyfin server
    #[arg(long)]
    jellyfin_url1: Option<String>,

    /// Login account for the first server
    #[arg(long)]
    jellyfin_username1: Option<String>,

    /// Password for the first server (falls back to stored credentials)
    #[arg(long)]
    jellyfin_password1: Option<String>,

    /// Library user for the second server (defaults to the login account)
    #[arg(long)]
    username2: Option<String>,

    /// URL of the second Jellyfin server
    #[arg(long)]
    jellyfin_url2: Option<String>,

    /// Login account for the second server
    #[arg(long)]
    jellyfin_username2: Option<String>,

    /// Password for the second server (falls back to stored credentials)
    #[arg(long)]
    jellyfin_password2: Option<String>,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks passwords)
    Show {
        /// Show passwords in clear text
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },

    /// Store a server password in the credentials file
    #[command(long_about = "Store the password for a server login so it does not have to be passed on the command line or kept in config.toml. Prompts when --password is not given.")]
    Password {
        /// Server URL, as used in the config
        #[arg(long)]
        url: String,

        /// Login account on that server
        #[arg(long)]
        username: String,

        /// Password (if not provided, will prompt)
        #[arg(long)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let session = SessionStamp::now();
    let paths = PathManager::default();
    let config_file = cli.config_file.clone().unwrap_or_else(|| paths.config_file());

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Sync(args) => {
            let plan = commands::sync::SyncPlan::prepare(&args, &config_file, &paths)?;
            let log_file = plan.log_to_file().then(|| paths.session_log_file(&session));
            logging::init_logging_with_file(cli.verbose, cli.quiet, log_file.clone())
                .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
            commands::sync::run_sync(plan, session, log_file, &output).await
        }
        Commands::Config { cmd } => {
            logging::init_logging(cli.verbose, cli.quiet).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
            match cmd {
                ConfigCommands::Show { full } => commands::config::show_config(&config_file, &paths, full, &output),
                ConfigCommands::Password { url, username, password } => {
                    commands::config::store_password(&paths, &url, &username, password, &output)
                }
            }
        }
    }
}
