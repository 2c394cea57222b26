use crate::output::{Output, OutputFormat};
use crate::SyncArgs;
use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use media_sync_config::{Config, CredentialStore, PathManager, ServerConfig, SessionStamp};
use media_sync_core::{IssueKind, SyncOrchestrator, SyncResult};
use serde_json::json;
use std::path::{Path, PathBuf};

/// Configuration for one run: the config file with command-line flags applied
#[derive(Debug)]
pub struct SyncPlan {
    pub config: Config,
    pub library_a: ServerConfig,
    pub library_b: ServerConfig,
    log_flag: bool,
}

impl SyncPlan {
    pub fn prepare(args: &SyncArgs, config_file: &Path, paths: &PathManager) -> Result<Self> {
        let config_path = config_file.to_path_buf();
        let config = Config::load_or_default(&config_path)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_path.display(), e))?;

        let credentials_file = paths.credentials_file();
        let mut credentials = CredentialStore::new(credentials_file.clone());
        credentials
            .load()
            .map_err(|e| eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;

        let plan = Self::from_parts(config, args, &credentials);
        plan.config.sync.validate().wrap_err("Invalid [sync] settings")?;
        Ok(plan)
    }

    fn from_parts(mut config: Config, args: &SyncArgs, credentials: &CredentialStore) -> Self {
        if let Some(page_size) = args.page_size {
            config.sync.page_size = page_size;
        }

        let mut library_a = config.library_a.clone().unwrap_or_default();
        apply_server_overrides(
            &mut library_a,
            &args.username1,
            &args.jellyfin_url1,
            &args.jellyfin_username1,
            &args.jellyfin_password1,
        );
        fill_password(&mut library_a, credentials);

        let mut library_b = config.library_b.clone().unwrap_or_default();
        apply_server_overrides(
            &mut library_b,
            &args.username2,
            &args.jellyfin_url2,
            &args.jellyfin_username2,
            &args.jellyfin_password2,
        );
        fill_password(&mut library_b, credentials);

        Self {
            config,
            library_a,
            library_b,
            log_flag: args.log,
        }
    }

    pub fn log_to_file(&self) -> bool {
        self.log_flag || self.config.sync.log_to_file
    }
}

fn apply_server_overrides(
    server: &mut ServerConfig,
    username: &Option<String>,
    url: &Option<String>,
    login: &Option<String>,
    password: &Option<String>,
) {
    if let Some(username) = username {
        server.username = username.clone();
    }
    if let Some(url) = url {
        server.server_url = url.clone();
    }
    if let Some(login) = login {
        server.server_username = login.clone();
    }
    if let Some(password) = password {
        server.server_password = password.clone();
    }
}

fn fill_password(server: &mut ServerConfig, credentials: &CredentialStore) {
    if !server.server_password.is_empty() {
        return;
    }
    if let Some(password) = credentials.get_server_password(&server.server_url, &server.server_username) {
        tracing::debug!(server = %server.server_url, "Using stored password for {}", server.server_username);
        server.server_password = password.clone();
    }
}

pub async fn run_sync(plan: SyncPlan, session: SessionStamp, log_file: Option<PathBuf>, output: &Output) -> Result<()> {
    tracing::debug!("Sync command started");

    let orchestrator = SyncOrchestrator::new(plan.config.sync.clone(), session);
    let result = match orchestrator.run(&plan.library_a, &plan.library_b).await {
        Ok(result) => result,
        Err(e) => {
            output.error(format!("Sync aborted: {}", e));
            return Err(color_eyre::Report::new(e).wrap_err("Sync failed before contacting either server"));
        }
    };

    print_summary(&result, log_file.as_deref(), output);
    Ok(())
}

fn print_summary(result: &SyncResult, log_file: Option<&Path>, output: &Output) {
    let report = &result.report;

    match output.format() {
        OutputFormat::Human => {
            for issue in &report.issues {
                output.warn(issue.to_string());
            }
            for direction in &report.directions {
                output.info(format!(
                    "{}: {} scanned, {} matched, {} writes ({} failed)",
                    direction.label,
                    direction.scanned,
                    direction.matched,
                    direction.writes_applied + direction.writes_failed,
                    direction.writes_failed
                ));
            }
            if let Some(path) = log_file {
                output.info(format!("Session log: {}", path.display()));
            }

            let summary = format!(
                "Synced {} matched items in {:.1}s",
                result.matched_items(),
                result.duration.as_secs_f64()
            );
            if report.writes_failed() > 0 || report.issues_of(IssueKind::Login).next().is_some() {
                output.warn(summary);
            } else {
                output.success(summary);
            }
        }
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let report_value = serde_json::to_value(report).unwrap_or_default();
            output.json(&json!({
                "type": "sync_summary",
                "session": result.session.to_string(),
                "matched_items": result.matched_items(),
                "duration_ms": result.duration.as_millis() as u64,
                "writes_applied": report.writes_applied(),
                "writes_failed": report.writes_failed(),
                "log_file": log_file.map(|p| p.display().to_string()),
                "report": report_value,
            }));
        }
    }
}
