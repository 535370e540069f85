//! Snapshot to view model.
//!
//! Rendering has no invariants of its own: everything a frontend shows is
//! derived here from a [`Snapshot`], so every frontend agrees on labels,
//! truncation and which move controls are live.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::{
    reorder::{Direction, can_move},
    snapshot::Snapshot,
};

/// Shown in place of the table when nobody is registered.
pub const EMPTY_MESSAGE: &str = "No nodes have connected";

/// Shown for nodes without a known hardware address.
pub const NO_MAC: &str = "N/A";

/// Shown for timestamps outside the representable range.
pub const UNKNOWN_TIME: &str = "unknown";

/// One table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// 0-based index in the node list.
    pub index: usize,
    /// 1-based position shown to the operator.
    pub position: usize,
    /// Name truncated for display.
    pub name: String,
    /// Hardware address or [`NO_MAC`].
    pub mac: String,
    /// Network address.
    pub ip: String,
    /// Registration time, RFC 3339 in UTC.
    pub created: String,
    /// Row belongs to this client.
    pub you: bool,
    /// "Move up" is available.
    pub can_move_up: bool,
    /// "Move down" is available.
    pub can_move_down: bool,
}

/// Everything a frontend needs to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Table rows in server order.
    pub rows: Vec<RowView>,
    /// This client has a row.
    pub registered: bool,
    /// Global status flag.
    pub status_on: bool,
    /// A refresh is in flight.
    pub loading: bool,
    /// Last successful refresh, RFC 3339 in UTC.
    pub refreshed_at: Option<String>,
    /// Last refresh failure.
    pub last_error: Option<String>,
}

impl View {
    /// No nodes are registered.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Label for the status toggle.
    pub fn status_label(&self) -> &'static str {
        if self.status_on { "Status: ON" } else { "Status: OFF" }
    }

    /// Label for the registration toggle.
    pub fn registration_label(&self) -> &'static str {
        if self.registered { "Unregister" } else { "Register" }
    }
}

/// Project a snapshot into a view.
pub fn project(snapshot: &Snapshot) -> View {
    let len = snapshot.nodes.len();
    let rows = snapshot
        .nodes
        .iter()
        .enumerate()
        .map(|(index, node)| RowView {
            index,
            position: index + 1,
            name: node.display_name().to_string(),
            mac: node.mac.clone().unwrap_or_else(|| NO_MAC.to_string()),
            ip: node.ip.clone(),
            created: node
                .created
                .to_system_time()
                .map_or_else(|| UNKNOWN_TIME.to_string(), format_time),
            you: node.you,
            can_move_up: can_move(len, index, Direction::Up),
            can_move_down: can_move(len, index, Direction::Down),
        })
        .collect::<Vec<_>>();

    View {
        registered: rows.iter().any(|r| r.you),
        rows,
        status_on: snapshot.status,
        loading: snapshot.loading,
        refreshed_at: snapshot.refreshed_at.map(format_time),
        last_error: snapshot.last_error.clone(),
    }
}

/// RFC 3339 with millisecond precision, `Z` suffix. Times before the epoch
/// clamp to it.
pub fn format_time(time: SystemTime) -> String {
    let since = time.duration_since(UNIX_EPOCH).unwrap_or_default();
    i64::try_from(since.as_secs())
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, since.subsec_nanos()))
        .map_or_else(
            || UNKNOWN_TIME.to_string(),
            |t| t.to_rfc3339_opts(SecondsFormat::Millis, true),
        )
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, UNIX_EPOCH};

    use rollcall_proto::{Created, Node};

    use super::*;

    fn node(name: &str, mac: Option<&str>, you: bool) -> Node {
        Node {
            name: name.into(),
            mac: mac.map(Into::into),
            ip: "192.168.1.20".into(),
            created: Created::from_secs(1_700_000_000),
            you,
        }
    }

    #[test]
    fn empty_snapshot_projects_empty_view() {
        let view = project(&Snapshot::default());
        assert!(view.is_empty());
        assert!(!view.registered);
        assert_eq!(view.status_label(), "Status: OFF");
        assert_eq!(view.registration_label(), "Register");
        assert_eq!(view.refreshed_at, None);
    }

    #[test]
    fn rows_carry_display_fields() {
        let snapshot = Snapshot {
            status: true,
            nodes: vec![
                node("a-very-long-name-that-goes-on", Some("aa:bb:cc:dd:ee:ff"), false),
                node("me", None, true),
            ],
            refreshed_at: Some(UNIX_EPOCH + Duration::from_millis(1_700_000_000_250)),
            ..Snapshot::default()
        };

        let view = project(&snapshot);
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].position, 1);
        assert_eq!(view.rows[0].name, "a-very-long-name-tha");
        assert_eq!(view.rows[0].mac, "aa:bb:cc:dd:ee:ff");
        assert_eq!(view.rows[1].mac, NO_MAC);
        assert_eq!(view.rows[1].created, "2023-11-14T22:13:20.000Z");
        assert!(view.rows[1].you);
        assert!(view.registered);
        assert_eq!(view.status_label(), "Status: ON");
        assert_eq!(view.registration_label(), "Unregister");
        assert_eq!(view.refreshed_at.as_deref(), Some("2023-11-14T22:13:20.250Z"));
    }

    #[test]
    fn boundary_move_controls_disabled() {
        let snapshot = Snapshot {
            nodes: vec![node("a", None, false), node("b", None, false), node("c", None, false)],
            ..Snapshot::default()
        };
        let view = project(&snapshot);
        let controls: Vec<_> = view.rows.iter().map(|r| (r.can_move_up, r.can_move_down)).collect();
        assert_eq!(controls, vec![(false, true), (true, true), (true, false)]);
    }

    #[test]
    fn far_future_created_is_unknown() {
        let mut far = node("a", None, false);
        far.created = Created { secs_since_epoch: u64::MAX, nanos_since_epoch: 0 };
        let snapshot = Snapshot { nodes: vec![far], ..Snapshot::default() };
        assert_eq!(project(&snapshot).rows[0].created, UNKNOWN_TIME);
    }

    #[test]
    fn single_row_cannot_move() {
        let snapshot = Snapshot { nodes: vec![node("a", None, true)], ..Snapshot::default() };
        let row = &project(&snapshot).rows[0];
        assert!(!row.can_move_up);
        assert!(!row.can_move_down);
    }
}
