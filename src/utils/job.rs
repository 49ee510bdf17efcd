// src/utils/job.rs
//
// End-to-end commenting job: login once, then one pass over the targets

use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    application::models::identity::resolve_identity,
    application::models::target::{repeat_profile, Target},
    application::services::delay::DelayPolicy,
    application::services::runner::{RunReport, TargetRunner},
    config::Config,
    error::AppError,
    session::auth::{LoginRequest, SteamLogin},
    storage::targets_csv::load_csv_targets,
    transport::client::SteamClient,
    transport::http_client::CommentPoster,
};

/// Where the targets of a job come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSource {
    /// One profile (SteamID64 or `/profiles/` URL) commented `count` times.
    Profile { profile: String, count: usize },
    /// CSV file with `profile` and optional `message` columns.
    Csv { path: String },
}

impl TargetSource {
    /// Falls back to `CSV_PATH` from the configuration when nothing explicit was given.
    pub fn from_config(config: &Config) -> Option<Self> {
        config
            .csv_path
            .as_ref()
            .map(|path| TargetSource::Csv { path: path.clone() })
    }
}

/// Builds the target list for a job.
///
/// A bad single profile is an error (there is nothing else to do); bad CSV rows
/// are skipped by the loader.
pub fn collect_targets(source: &TargetSource, default_message: &str) -> Result<Vec<Target>, AppError> {
    match source {
        TargetSource::Profile { profile, count } => {
            let steam_id = resolve_identity(profile)?;
            Ok(repeat_profile(steam_id, default_message, *count))
        }
        TargetSource::Csv { path } => load_csv_targets(path, default_message),
    }
}

/// Logs in and comments on every target.
///
/// # Arguments
///
/// * `cfg` - Credentials, pacing and login settings
/// * `client` - Steam network connection used for log-on
/// * `poster` - Comment transport
/// * `targets` - Ordered targets; an empty list returns an empty report without logging in
///
/// # Returns
///
/// * `Result<RunReport, AppError>` - Per-run counts; only a failed login is an error
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use steam_commenter::config::Config;
/// use steam_commenter::transport::client::SteamClient;
/// use steam_commenter::transport::http_client::CommunityWebClient;
/// use steam_commenter::utils::job::{collect_targets, run_job, TargetSource};
///
/// async fn example<C: SteamClient>(client: Arc<C>) -> Result<(), Box<dyn std::error::Error>> {
///     let cfg = Config::from_dotenv();
///     let poster = Arc::new(CommunityWebClient::new(&cfg.community.base_url, cfg.community.timeout)?);
///     let source = TargetSource::Csv { path: "targets.csv".to_string() };
///     let targets = collect_targets(&source, &cfg.default_message)?;
///
///     let report = run_job(&cfg, client, poster, &targets).await?;
///     println!("{} ok, {} failed", report.succeeded, report.failed);
///     Ok(())
/// }
/// ```
pub async fn run_job<C, P>(
    cfg: &Config,
    client: Arc<C>,
    poster: Arc<P>,
    targets: &[Target],
) -> Result<RunReport, AppError>
where
    C: SteamClient,
    P: CommentPoster,
{
    if targets.is_empty() {
        warn!("No targets to process. Exiting.");
        return Ok(RunReport::default());
    }

    let delay = DelayPolicy::from_config(&cfg.pacing);
    info!("Targets: {}, pacing: {}", targets.len(), delay);

    info!("Logging in ...");
    let login = SteamLogin::from_config(client, cfg);
    let session = login.login(LoginRequest::from_config(cfg)).await?;
    info!("Login successful. Starting to post comments...");

    let runner = TargetRunner::new(poster);
    let report = runner
        .run(&session, targets, &cfg.default_message, &delay)
        .await;

    info!(
        "Done. {} succeeded, {} failed out of {}",
        report.succeeded, report.failed, report.attempted
    );
    Ok(report)
}
