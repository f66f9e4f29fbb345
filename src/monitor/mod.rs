//! Browser roster monitor: polls an already-open page through the remote
//! debugging endpoint and appends timestamped snapshots to a JSON file.

pub mod devtools;
pub mod snapshot;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::error::Result;
use crate::model::{MemberRecord, TeamSnapshot};

/// Granularity of the inter-poll sleep; the cancellation token is observed
/// at least this often.
const SLEEP_SLICE: Duration = Duration::from_millis(200);

/// Cooperative stop flag checked by the polling loop on every iteration.
/// The binary maps Ctrl-C onto [`CancelToken::cancel`]; the loop itself
/// never touches process signals.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Where member rows come from. The production source is a DevTools page
/// session; tests substitute canned rows.
pub trait MemberSource {
    fn fetch_members(&mut self) -> Result<Vec<MemberRecord>>;
}

impl MemberSource for devtools::PageSession {
    fn fetch_members(&mut self) -> Result<Vec<MemberRecord>> {
        devtools::PageSession::fetch_members(self)
    }
}

/// Monitor settings resolved by the CLI.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub team: String,
    pub output: PathBuf,
    pub interval: Duration,
    pub continuous: bool,
}

/// Runs the monitor: one capture in single-shot mode, otherwise polling
/// until the token is cancelled. A failed poll in continuous mode is logged
/// and polling continues; single-shot propagates the failure.
#[instrument(
    level = "info",
    skip_all,
    fields(team = %config.team, output = %config.output.display())
)]
pub fn run(config: &MonitorConfig, source: &mut dyn MemberSource, token: &CancelToken) -> Result<()> {
    loop {
        if token.is_cancelled() {
            info!("monitor cancelled");
            return Ok(());
        }

        match poll_once(config, source) {
            Ok(count) => {
                println!(
                    "数据已保存: {}, 团队: {}, 共 {} 个成员",
                    snapshot::beijing_timestamp(),
                    config.team,
                    count
                );
            }
            Err(error) if config.continuous => {
                warn!(%error, "poll failed, retrying next interval");
            }
            Err(error) => return Err(error),
        }

        if !config.continuous {
            return Ok(());
        }
        sleep_with_token(config.interval, token);
    }
}

fn poll_once(config: &MonitorConfig, source: &mut dyn MemberSource) -> Result<usize> {
    let members = source.fetch_members()?;
    let count = members.len();
    let captured = TeamSnapshot {
        team: config.team.clone(),
        timestamp: snapshot::beijing_timestamp(),
        total_members: count,
        members,
    };
    snapshot::append_snapshot(&config.output, captured)?;
    Ok(count)
}

/// Sleeps for `duration`, waking early when the token is cancelled.
fn sleep_with_token(duration: Duration, token: &CancelToken) {
    let mut remaining = duration;
    while !remaining.is_zero() && !token.is_cancelled() {
        let slice = remaining.min(SLEEP_SLICE);
        thread::sleep(slice);
        remaining -= slice;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    struct CannedSource {
        calls: usize,
        cancel_after: usize,
        token: CancelToken,
    }

    impl MemberSource for CannedSource {
        fn fetch_members(&mut self) -> Result<Vec<MemberRecord>> {
            self.calls += 1;
            if self.calls >= self.cancel_after {
                self.token.cancel();
            }
            Ok(vec![MemberRecord {
                name: "X".into(),
                email: format!("x{}@y.com", self.calls),
                last_used: "-".into(),
                role: "Member".into(),
            }])
        }
    }

    fn config(output: PathBuf, continuous: bool) -> MonitorConfig {
        MonitorConfig {
            team: "alpha".into(),
            output,
            interval: Duration::ZERO,
            continuous,
        }
    }

    #[test]
    fn single_shot_captures_one_snapshot() {
        let dir = tempdir().expect("temporary directory");
        let output = dir.path().join("team-alpha-data.json");
        let token = CancelToken::new();
        let mut source = CannedSource {
            calls: 0,
            cancel_after: usize::MAX,
            token: token.clone(),
        };

        run(&config(output.clone(), false), &mut source, &token).expect("monitor ran");

        let stored: Vec<TeamSnapshot> =
            serde_json::from_str(&fs::read_to_string(&output).expect("file read"))
                .expect("array parsed");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].total_members, 1);
        assert_eq!(stored[0].team, "alpha");
    }

    #[test]
    fn continuous_mode_polls_until_cancelled() {
        let dir = tempdir().expect("temporary directory");
        let output = dir.path().join("team-alpha-data.json");
        let token = CancelToken::new();
        let mut source = CannedSource {
            calls: 0,
            cancel_after: 3,
            token: token.clone(),
        };

        run(&config(output.clone(), true), &mut source, &token).expect("monitor ran");

        let stored: Vec<TeamSnapshot> =
            serde_json::from_str(&fs::read_to_string(&output).expect("file read"))
                .expect("array parsed");
        assert_eq!(stored.len(), 3);
        assert_eq!(source.calls, 3);
    }

    #[test]
    fn cancelled_token_stops_before_the_first_poll() {
        let dir = tempdir().expect("temporary directory");
        let output = dir.path().join("team-alpha-data.json");
        let token = CancelToken::new();
        token.cancel();
        let mut source = CannedSource {
            calls: 0,
            cancel_after: usize::MAX,
            token: token.clone(),
        };

        run(&config(output.clone(), true), &mut source, &token).expect("monitor ran");

        assert_eq!(source.calls, 0);
        assert!(!output.exists());
    }
}
