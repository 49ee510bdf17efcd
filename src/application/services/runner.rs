use crate::application::models::identity::SteamId;
use crate::application::models::target::Target;
use crate::application::services::delay::DelayPolicy;
use crate::session::interface::AuthenticatedSession;
use crate::transport::http_client::CommentPoster;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetFailure {
    pub steam_id: SteamId,
    pub reason: String,
}

/// Outcome of one pass over the targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<TargetFailure>,
}

impl RunReport {
    /// True when every attempted comment went through.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"attempted\":{},\"succeeded\":{},\"failed\":{}}}",
            self.attempted, self.succeeded, self.failed
        )
    }
}

/// Walks the targets in order, one comment each, pausing between them.
pub struct TargetRunner<P: CommentPoster> {
    poster: Arc<P>,
}

impl<P: CommentPoster> TargetRunner<P> {
    pub fn new(poster: Arc<P>) -> Self {
        Self { poster }
    }

    /// Failures are recorded and the run moves on; nothing here aborts the run.
    pub async fn run(
        &self,
        session: &AuthenticatedSession,
        targets: &[Target],
        default_message: &str,
        delay: &DelayPolicy,
    ) -> RunReport {
        let mut report = RunReport::default();
        let total = targets.len();

        for (i, target) in targets.iter().enumerate() {
            info!("[{}/{}] Commenting on {}", i + 1, total, target.steam_id);
            report.attempted += 1;

            let message = target.message_or(default_message);
            match self.poster.post_comment(session, target.steam_id, message).await {
                Ok(()) => {
                    info!("Posted to {}", target.steam_id);
                    report.succeeded += 1;
                }
                Err(e) => {
                    error!("Failed for {}: {}", target.steam_id, e);
                    report.failed += 1;
                    report.failures.push(TargetFailure {
                        steam_id: target.steam_id,
                        reason: e.to_string(),
                    });
                }
            }

            if i + 1 < total {
                let waited = delay.next_delay().await;
                info!("Waited {}ms before next comment", waited);
            }
        }

        report
    }
}
