use routesync_core::model::{RouteChangeEvent, RouteChangeKind};
use routesync_core::session::parse_timestamp;
use serde::Deserialize;

use super::{topic, StreamError};
use crate::client::id_codec::deserialize_optional_id;

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RouteEventPayload {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    route_id: Option<String>,
    #[serde(default)]
    kind: Option<String>,
    #[serde(default, alias = "ts")]
    timestamp: Option<String>,
}

/// decodes a `route-started` message.
///
/// # Arguments
///
/// * `topic_name` - topic the message arrived on, carries the vehicle id
/// * `payload` - JSON body `{routeId, kind?, timestamp|ts}`
/// * `retained` - broker retain flag
///
/// # Returns
///
/// * the event, or an error for a foreign topic, undecodable JSON, a missing
///   route id or a missing/unparseable timestamp
pub fn decode_route_event(
    topic_name: &str,
    payload: &[u8],
    retained: bool,
) -> Result<RouteChangeEvent, StreamError> {
    let vehicle_id = topic::route_started_vehicle(topic_name)
        .ok_or_else(|| StreamError::UnexpectedTopic(topic_name.to_string()))?;
    let body: RouteEventPayload = serde_json::from_slice(payload)
        .map_err(|e| StreamError::MalformedPayload(e.to_string()))?;
    let route_id = body
        .route_id
        .filter(|r| !r.is_empty())
        .ok_or_else(|| StreamError::MalformedPayload(String::from("missing routeId")))?;
    let raw_ts = body
        .timestamp
        .ok_or_else(|| StreamError::MalformedPayload(String::from("missing timestamp")))?;
    let timestamp =
        parse_timestamp(&raw_ts).map_err(|e| StreamError::MalformedPayload(e.to_string()))?;
    Ok(RouteChangeEvent {
        route_id,
        kind: RouteChangeKind::from(body.kind.as_deref()),
        timestamp,
        retained,
        topic_vehicle_id: vehicle_id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_with_ts_alias() {
        let event = decode_route_event(
            "vehicle/v1/route-started",
            br#"{"routeId": 42, "kind": "rescue", "ts": "2025-09-01T10:00:00Z"}"#,
            true,
        )
        .expect("event should decode");
        assert_eq!(event.route_id, "42");
        assert_eq!(event.kind, RouteChangeKind::Rescue);
        assert_eq!(event.topic_vehicle_id, "v1");
        assert!(event.retained);
    }

    #[test]
    fn test_unknown_kind_is_normal() {
        let event = decode_route_event(
            "vehicle/v1/route-started",
            br#"{"routeId": "r1", "kind": "express", "timestamp": "2025-09-01T10:00:00+02:00"}"#,
            false,
        )
        .expect("event should decode");
        assert_eq!(event.kind, RouteChangeKind::Normal);
    }

    #[test]
    fn test_rejections() {
        let topic = "vehicle/v1/route-started";
        assert!(decode_route_event(topic, b"not json", false).is_err());
        assert!(decode_route_event(topic, br#"{"ts": "2025-09-01T10:00:00Z"}"#, false).is_err());
        assert!(decode_route_event(topic, br#"{"routeId": "r1"}"#, false).is_err());
        assert!(decode_route_event(topic, br#"{"routeId": "r1", "ts": "yesterday"}"#, false).is_err());
        assert!(matches!(
            decode_route_event("vehicle/v1/other", br#"{"routeId": "r1"}"#, false),
            Err(StreamError::UnexpectedTopic(_))
        ));
    }
}
