use std::fs;
use std::path::Path;

use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::model::{NO_NAME_MARKER, RosterEntry, TeamSnapshot, UNKNOWN_LABEL};

const TEAM_FILE_PREFIX: &str = "team-";
const TEAM_FILE_SUFFIX: &str = "-data.json";

/// Loads every `*.json` snapshot file in `directory` and flattens all
/// members across all snapshots into one ordered roster. The team label is
/// derived from the file name (`team-<team>-data.json`). A missing directory
/// or a malformed file aborts the load; there is no skip-and-continue.
#[instrument(level = "info", skip_all, fields(directory = %directory.display()))]
pub fn load_roster(directory: &Path) -> Result<Vec<RosterEntry>> {
    let mut file_names = Vec::new();
    for dir_entry in fs::read_dir(directory)? {
        let file_name = dir_entry?.file_name().to_string_lossy().into_owned();
        if file_name.ends_with(".json") {
            file_names.push(file_name);
        }
    }
    // Directory iteration order is platform-dependent.
    file_names.sort();

    let mut entries = Vec::new();
    for file_name in file_names {
        let team = team_label(&file_name);
        let content = fs::read_to_string(directory.join(&file_name))?;
        let snapshots: Vec<TeamSnapshot> = serde_json::from_str(&content)?;
        debug!(file = %file_name, snapshots = snapshots.len(), "parsed snapshot file");

        for snapshot in snapshots {
            for member in snapshot.members {
                let name = if member.name == NO_NAME_MARKER {
                    UNKNOWN_LABEL.to_string()
                } else {
                    member.name
                };
                entries.push(RosterEntry {
                    email: member.email,
                    name,
                    role: member.role,
                    last_used: member.last_used,
                    team: team.clone(),
                });
            }
        }
    }
    info!(entries = entries.len(), "roster flattened");
    Ok(entries)
}

/// `team-alpha-data.json` → `alpha`; unrecognised names keep their stem.
fn team_label(file_name: &str) -> String {
    let stem = file_name
        .strip_suffix(TEAM_FILE_SUFFIX)
        .or_else(|| file_name.strip_suffix(".json"))
        .unwrap_or(file_name);
    stem.strip_prefix(TEAM_FILE_PREFIX).unwrap_or(stem).to_string()
}
