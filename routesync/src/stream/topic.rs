//! topic layout of the vehicle event broker.

pub const ROUTE_STARTED_WILDCARD: &str = "vehicle/+/route-started";
const VEHICLE_PREFIX: &str = "vehicle";
const ROUTE_STARTED_SUFFIX: &str = "route-started";
const POSITION_SUFFIX: &str = "position";

pub fn route_started_topic(vehicle_id: &str) -> String {
    format!("{VEHICLE_PREFIX}/{vehicle_id}/{ROUTE_STARTED_SUFFIX}")
}

pub fn position_topic(vehicle_id: &str) -> String {
    format!("{VEHICLE_PREFIX}/{vehicle_id}/{POSITION_SUFFIX}")
}

/// the vehicle id of a `vehicle/{id}/route-started` topic.
pub fn route_started_vehicle(topic: &str) -> Option<&str> {
    let mut parts = topic.split('/');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(VEHICLE_PREFIX), Some(vid), Some(ROUTE_STARTED_SUFFIX), None)
            if !vid.is_empty() && vid != "+" && vid != "#" =>
        {
            Some(vid)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_started_vehicle() {
        assert_eq!(route_started_vehicle("vehicle/v12/route-started"), Some("v12"));
        assert_eq!(route_started_vehicle("vehicle//route-started"), None);
        assert_eq!(route_started_vehicle("vehicle/v12/position"), None);
        assert_eq!(route_started_vehicle("vehicle/v12/route-started/x"), None);
        assert_eq!(route_started_vehicle(ROUTE_STARTED_WILDCARD), None);
    }

    #[test]
    fn test_topics() {
        assert_eq!(route_started_topic("7"), "vehicle/7/route-started");
        assert_eq!(position_topic("7"), "vehicle/7/position");
    }
}
