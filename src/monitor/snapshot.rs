use std::fs;
use std::path::Path;

use chrono::{Duration, SecondsFormat, Utc};
use tracing::warn;

use crate::error::Result;
use crate::model::TeamSnapshot;

/// ISO timestamp in Beijing time (UTC+8), the zone the snapshot files have
/// always used.
pub fn beijing_timestamp() -> String {
    (Utc::now() + Duration::hours(8)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Appends one snapshot to the JSON array at `path`, creating the file and
/// its parent directory when missing. An existing file that does not parse
/// as a snapshot array is replaced so the monitor can keep collecting.
pub fn append_snapshot(path: &Path, snapshot: TeamSnapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut snapshots: Vec<TeamSnapshot> = if path.exists() {
        let content = fs::read_to_string(path)?;
        match serde_json::from_str(&content) {
            Ok(existing) => existing,
            Err(error) => {
                warn!(path = %path.display(), %error, "snapshot file unreadable, starting a new array");
                Vec::new()
            }
        }
    } else {
        Vec::new()
    };

    snapshots.push(snapshot);
    fs::write(path, serde_json::to_string_pretty(&snapshots)?)?;
    Ok(())
}
