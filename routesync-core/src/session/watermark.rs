use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};

use super::SessionError;

/// parses an ISO-8601 / RFC 3339 event timestamp.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, SessionError> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map_err(|e| SessionError::InvalidTimestamp(format!("{raw}: {e}")))
}

/// per-vehicle high-water mark of applied route-change event timestamps.
///
/// an event is applied only when its timestamp is strictly greater than the
/// mark for its vehicle, which makes redelivery and out-of-order delivery
/// no-ops.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventWatermarks {
    marks: HashMap<String, DateTime<FixedOffset>>,
}

impl EventWatermarks {
    pub fn get(&self, vehicle_id: &str) -> Option<&DateTime<FixedOffset>> {
        self.marks.get(vehicle_id)
    }

    /// seeds a mark read from persistent storage. an existing in-memory mark
    /// is kept when it is newer.
    pub fn seed(&mut self, vehicle_id: &str, timestamp: DateTime<FixedOffset>) {
        let entry = self.marks.entry(vehicle_id.to_string()).or_insert(timestamp);
        if timestamp > *entry {
            *entry = timestamp;
        }
    }

    pub fn is_newer(&self, vehicle_id: &str, timestamp: &DateTime<FixedOffset>) -> bool {
        match self.marks.get(vehicle_id) {
            Some(mark) => timestamp > mark,
            None => true,
        }
    }

    /// advances the mark if `timestamp` is newer. returns true when the event
    /// should be applied.
    pub fn try_advance(&mut self, vehicle_id: &str, timestamp: DateTime<FixedOffset>) -> bool {
        if !self.is_newer(vehicle_id, &timestamp) {
            return false;
        }
        self.marks.insert(vehicle_id.to_string(), timestamp);
        true
    }

    pub fn remove(&mut self, vehicle_id: &str) {
        self.marks.remove(vehicle_id);
    }
}
