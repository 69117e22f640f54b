use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};

/// A place the vehicle can be sent to, as reported by the driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: i64,
    pub lat: f64,
    pub lng: f64,
    pub distance: f64,
    pub status: String,
}

/// The latest full report from the driver.
///
/// Only `targets` is interpreted; every other top-level field (the vehicle
/// position, busy flag, ...) is carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default)]
    pub targets: Vec<Target>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl StatusSnapshot {
    pub fn with_targets(targets: Vec<Target>) -> Self {
        Self {
            targets,
            extra: serde_json::Map::new(),
        }
    }
}

#[derive(Debug, Default)]
struct Reported {
    snapshot: Arc<StatusSnapshot>,
    reported_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// StatusStore
// ---------------------------------------------------------------------------

/// Holds the most recent [`StatusSnapshot`]. Each report replaces the previous
/// one wholesale; readers always get a complete snapshot.
#[derive(Debug, Default)]
pub struct StatusStore {
    inner: RwLock<Reported>,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report_status(&self, snapshot: StatusSnapshot) {
        let reported = Reported {
            snapshot: Arc::new(snapshot),
            reported_at: Some(Utc::now()),
        };
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = reported;
    }

    /// The current snapshot. Empty until the first report arrives.
    pub fn latest(&self) -> Arc<StatusSnapshot> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard.snapshot)
    }

    /// When the current snapshot was stored, or `None` before the first report.
    pub fn reported_at(&self) -> Option<DateTime<Utc>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .reported_at
    }

    /// Targets of the current snapshot, nearest first. Equal distances keep
    /// the order in which the driver reported them.
    pub fn list_targets_by_distance(&self) -> Vec<Target> {
        let mut targets = self.latest().targets.clone();
        targets.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        targets
    }

    pub fn get_target_ids(&self) -> BTreeSet<i64> {
        self.latest().targets.iter().map(|t| t.id).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn target(id: i64, distance: f64) -> Target {
        Target {
            id,
            lat: 35.0,
            lng: 135.7,
            distance,
            status: "initial".into(),
        }
    }

    #[test]
    fn empty_store_has_no_targets() {
        let store = StatusStore::new();
        assert!(store.list_targets_by_distance().is_empty());
        assert!(store.get_target_ids().is_empty());
        assert!(store.reported_at().is_none());
    }

    #[test]
    fn sort_is_stable_on_equal_distance() {
        let store = StatusStore::new();
        store.report_status(StatusSnapshot::with_targets(vec![
            target(1, 5.0),
            target(2, 1.0),
            target(3, 1.0),
        ]));

        let ids: Vec<i64> = store
            .list_targets_by_distance()
            .iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn listing_does_not_reorder_the_snapshot() {
        let store = StatusStore::new();
        store.report_status(StatusSnapshot::with_targets(vec![
            target(1, 5.0),
            target(2, 1.0),
        ]));
        let _ = store.list_targets_by_distance();

        let ids: Vec<i64> = store.latest().targets.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn report_replaces_wholesale() {
        let store = StatusStore::new();
        store.report_status(StatusSnapshot::with_targets(vec![
            target(1, 1.0),
            target(2, 2.0),
        ]));
        store.report_status(StatusSnapshot::with_targets(vec![target(7, 3.0)]));

        assert_eq!(store.get_target_ids(), BTreeSet::from([7]));
        assert!(store.reported_at().is_some());
    }

    #[test]
    fn snapshot_without_targets_field_deserializes_empty() {
        let snapshot: StatusSnapshot =
            serde_json::from_str(r#"{"car": {"id": 1, "busy": false}}"#).unwrap();
        assert!(snapshot.targets.is_empty());
        assert_eq!(snapshot.extra["car"]["id"], 1);
    }

    #[test]
    fn uninterpreted_fields_round_trip() {
        let raw = serde_json::json!({
            "car": {"id": 1, "lat": 35.01, "lng": 135.76, "busy": true},
            "targets": [
                {"id": 4, "lat": 35.0, "lng": 135.7, "distance": 120.5, "status": "initial"}
            ]
        });
        let snapshot: StatusSnapshot = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(snapshot.targets[0].id, 4);
        assert_eq!(serde_json::to_value(&snapshot).unwrap(), raw);
    }
}
