use serde::{Deserialize, Serialize};

/// Label shown when a member has no usable display name or team label.
pub const UNKNOWN_LABEL: &str = "未知";

/// Placeholder the scraped page uses for members without a display name.
pub const NO_NAME_MARKER: &str = "No name available";

/// One member row as captured from the team settings page. Field names
/// follow the snapshot wire format (camelCase).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub last_used: String,
    #[serde(default)]
    pub role: String,
}

/// One monitor poll: the member list captured at a point in time. Snapshot
/// files hold a JSON array of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSnapshot {
    /// Team label; older snapshot files omit it, the team is then derived
    /// from the file name instead.
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub total_members: usize,
    pub members: Vec<MemberRecord>,
}

/// A flattened roster row: one member occurrence from one snapshot, tagged
/// with the team label derived from its source file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub email: String,
    pub name: String,
    pub role: String,
    pub last_used: String,
    pub team: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_deserializes_wire_format() {
        let source = r#"[{
            "timestamp": "2024-03-20T08:00:00.000Z",
            "totalMembers": 1,
            "members": [{
                "name": "X",
                "email": "x@y.com",
                "lastUsed": "2024-03-19",
                "role": "Member"
            }]
        }]"#;

        let snapshots: Vec<TeamSnapshot> = serde_json::from_str(source).expect("snapshot parsed");
        assert_eq!(snapshots.len(), 1);
        assert_eq!(snapshots[0].team, "");
        assert_eq!(snapshots[0].total_members, 1);
        assert_eq!(snapshots[0].members[0].last_used, "2024-03-19");
    }

    #[test]
    fn snapshot_roundtrips_with_team() {
        let snapshot = TeamSnapshot {
            team: "alpha".into(),
            timestamp: "2024-03-20T08:00:00.000Z".into(),
            total_members: 0,
            members: Vec::new(),
        };

        let json = serde_json::to_string(&snapshot).expect("snapshot serialized");
        assert!(json.contains("\"totalMembers\":0"));
        let restored: TeamSnapshot = serde_json::from_str(&json).expect("snapshot parsed");
        assert_eq!(restored, snapshot);
    }
}
