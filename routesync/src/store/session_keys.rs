use routesync_core::session::PersistedSession;

use super::{SessionStore, StoreError};

pub const ACTIVE_ROUTE_ID_KEY: &str = "activeRouteId";
pub const CURRENT_SEGMENT_INDEX_KEY: &str = "currentSegmentIndex";
pub const VEHICLE_ID_KEY: &str = "vehicleId";
pub const IS_ON_ROUTE_KEY: &str = "isOnRoute";
pub const LAST_EVENT_TIMESTAMP_PREFIX: &str = "lastEventTimestamp:";

/// key of the route event watermark for a vehicle.
pub fn last_event_timestamp_key(vehicle_id: &str) -> String {
    format!("{LAST_EVENT_TIMESTAMP_PREFIX}{vehicle_id}")
}

/// the keys that make up a persisted session. the watermark key is included
/// when the vehicle is known.
pub fn session_keys(vehicle_id: Option<&str>) -> Vec<String> {
    let mut keys = vec![
        ACTIVE_ROUTE_ID_KEY.to_string(),
        CURRENT_SEGMENT_INDEX_KEY.to_string(),
        VEHICLE_ID_KEY.to_string(),
        IS_ON_ROUTE_KEY.to_string(),
    ];
    if let Some(vid) = vehicle_id {
        keys.push(last_event_timestamp_key(vid));
    }
    keys
}

/// reads the persisted session. read failures are logged and read as absent
/// values, which resolves to "no session".
pub fn load_persisted<S: SessionStore + ?Sized>(store: &S) -> PersistedSession {
    let read = |key: &str| match store.get(key) {
        Ok(value) => value.filter(|v| !v.is_empty()),
        Err(e) => {
            log::warn!("failure reading '{key}' from session store: {e}");
            None
        }
    };
    PersistedSession {
        active_route_id: read(ACTIVE_ROUTE_ID_KEY),
        current_segment_index: read(CURRENT_SEGMENT_INDEX_KEY).and_then(|s| s.parse().ok()),
        vehicle_id: read(VEHICLE_ID_KEY),
        on_route: read(IS_ON_ROUTE_KEY).as_deref() == Some("true"),
    }
}

/// removes every persisted session key, including the watermark of
/// `vehicle_id` when given.
pub fn clear_persisted<S: SessionStore + ?Sized>(
    store: &mut S,
    vehicle_id: Option<&str>,
) -> Result<(), StoreError> {
    store.remove_all(&session_keys(vehicle_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_load_persisted() {
        let store = MemoryStore::with_entries(&[
            (ACTIVE_ROUTE_ID_KEY, "r1"),
            (CURRENT_SEGMENT_INDEX_KEY, "4"),
            (VEHICLE_ID_KEY, "v1"),
            (IS_ON_ROUTE_KEY, "true"),
        ]);
        let persisted = load_persisted(&store);
        assert_eq!(persisted.active_route_id.as_deref(), Some("r1"));
        assert_eq!(persisted.current_segment_index, Some(4));
        assert_eq!(persisted.vehicle_id.as_deref(), Some("v1"));
        assert!(persisted.on_route);
    }

    #[test]
    fn test_unparseable_index_is_absent() {
        let store = MemoryStore::with_entries(&[(CURRENT_SEGMENT_INDEX_KEY, "NaN")]);
        assert_eq!(load_persisted(&store).current_segment_index, None);
    }

    #[test]
    fn test_clear_removes_five_keys() {
        let mut store = MemoryStore::with_entries(&[
            (ACTIVE_ROUTE_ID_KEY, "r1"),
            (CURRENT_SEGMENT_INDEX_KEY, "4"),
            (VEHICLE_ID_KEY, "v1"),
            (IS_ON_ROUTE_KEY, "true"),
            ("lastEventTimestamp:v1", "2025-09-01T10:00:00Z"),
            ("lastEventTimestamp:v2", "2025-09-01T10:00:00Z"),
        ]);
        clear_persisted(&mut store, Some("v1")).unwrap();
        assert_eq!(
            store.entries().unwrap(),
            vec![(
                String::from("lastEventTimestamp:v2"),
                String::from("2025-09-01T10:00:00Z")
            )]
        );
    }
}
