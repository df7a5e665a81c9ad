//! request and response bodies of the delivery and position services.
use geo::Point;
use routesync_core::session::RouteOwnership;
use serde::{Deserialize, Serialize};

use super::id_codec::{deserialize_id, deserialize_id_vec, deserialize_optional_id};

/// `GET /vehicle-routes/from/{userId}/active`
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ActiveRoute {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub vehicle_id: Option<String>,
    #[serde(default)]
    pub current_segment_index: Option<usize>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteMetadataFields {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub vehicle_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub associated_user_id: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub current_segment_index: Option<usize>,
}

/// `GET /vehicle-routes/{routeId}`. fields may sit at the top level or be
/// nested under `route`; top level values win.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RouteMetadata {
    #[serde(flatten)]
    pub fields: RouteMetadataFields,
    #[serde(default)]
    pub route: Option<RouteMetadataFields>,
}

impl RouteMetadata {
    pub fn vehicle_id(&self) -> Option<String> {
        self.fields
            .vehicle_id
            .clone()
            .or_else(|| self.route.as_ref().and_then(|r| r.vehicle_id.clone()))
    }

    pub fn associated_user_id(&self) -> Option<String> {
        self.fields.associated_user_id.clone().or_else(|| {
            self.route
                .as_ref()
                .and_then(|r| r.associated_user_id.clone())
        })
    }

    /// completed if either representation says so.
    pub fn completed(&self) -> bool {
        self.fields.completed == Some(true)
            || self.route.as_ref().and_then(|r| r.completed) == Some(true)
    }

    pub fn current_segment_index(&self) -> Option<usize> {
        self.fields.current_segment_index.or_else(|| {
            self.route
                .as_ref()
                .and_then(|r| r.current_segment_index)
        })
    }

    pub fn ownership(&self) -> RouteOwnership {
        RouteOwnership {
            associated_user_id: self.associated_user_id(),
            vehicle_id: self.vehicle_id(),
            completed: self.completed(),
            current_segment_index: self.current_segment_index(),
        }
    }
}

/// one row of `GET /vehicle-routes/{routeId}/realpath`
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RealPathRow {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// `[lon, lat]` pairs
    #[serde(default)]
    pub geometry: Option<Vec<[f64; 2]>>,
    #[serde(default)]
    pub from_label: Option<String>,
    #[serde(default)]
    pub to_label: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub from_node_index: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub to_node_index: Option<String>,
    #[serde(default, deserialize_with = "deserialize_id_vec")]
    pub order_ids: Vec<String>,
    #[serde(default)]
    pub distance_m: Option<f64>,
    #[serde(default)]
    pub time_s: Option<f64>,
}

impl RealPathRow {
    /// rows that cannot be drawn as a path are dropped by the client.
    pub fn has_path(&self) -> bool {
        self.geometry.as_ref().map(|g| g.len() > 1).unwrap_or(false)
    }
}

/// converts `[lon, lat]` pairs to points.
pub fn lon_lat_points(pairs: &[[f64; 2]]) -> Vec<Point<f64>> {
    pairs.iter().map(|[lon, lat]| Point::new(*lon, *lat)).collect()
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct NodeInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// `GET /nodes/{nodeId}`, either `{node: {...}}` or flat.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct NodeEnvelope {
    #[serde(default)]
    pub node: Option<NodeInfo>,
    #[serde(flatten)]
    pub flat: NodeInfo,
}

impl NodeEnvelope {
    pub fn into_node(self) -> NodeInfo {
        self.node.unwrap_or(self.flat)
    }
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusFields {
    #[serde(default)]
    pub user_status: Option<String>,
}

/// `GET /users/{userId}`, either `{user: {userStatus}}` or flat.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserEnvelope {
    #[serde(default)]
    pub user: Option<UserStatusFields>,
    #[serde(default)]
    pub user_status: Option<String>,
}

impl UserEnvelope {
    pub fn status(&self) -> Option<String> {
        self.user
            .as_ref()
            .and_then(|u| u.user_status.clone())
            .or_else(|| self.user_status.clone())
    }
}

pub const ON_ROUTE_STATUS: &str = "ON_ROUTE";
pub const IN_TRANSIT_STATUS: &str = "IN_TRANSIT";
pub const API_OK: i64 = 200;

/// the `{code, message}` envelope of command endpoints.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct ApiResponse {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiResponse {
    pub fn is_ok(&self) -> bool {
        self.code == Some(API_OK)
    }

    pub fn message_or(&self, fallback: &str) -> String {
        self.message.clone().unwrap_or_else(|| fallback.to_string())
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdate {
    pub current_segment_index: usize,
}

/// `POST /routes/recalculate-route`. the admin variant sends `vehicleId` and
/// `segmentIndex` with a null `segmentId`.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecalculationRequest {
    pub current_lat: f64,
    pub current_lon: f64,
    pub route_id: String,
    pub segment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment_index: Option<usize>,
}

impl RecalculationRequest {
    pub fn driver(position: &Point<f64>, route_id: &str, segment_id: &str) -> Self {
        RecalculationRequest {
            current_lat: position.y(),
            current_lon: position.x(),
            route_id: route_id.to_string(),
            segment_id: Some(segment_id.to_string()),
            vehicle_id: None,
            segment_index: None,
        }
    }

    pub fn admin(
        position: &Point<f64>,
        vehicle_id: &str,
        route_id: &str,
        segment_index: usize,
    ) -> Self {
        RecalculationRequest {
            current_lat: position.y(),
            current_lon: position.x(),
            route_id: route_id.to_string(),
            segment_id: None,
            vehicle_id: Some(vehicle_id.to_string()),
            segment_index: Some(segment_index),
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedSegment {
    #[serde(default)]
    pub geometry: Vec<[f64; 2]>,
    #[serde(default)]
    pub distance_m: Option<f64>,
    #[serde(default)]
    pub time_s: Option<f64>,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecalculationResponse {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub updated_segment: Option<UpdatedSegment>,
}

impl RecalculationResponse {
    /// the replacement segment when the service accepted the request.
    pub fn accepted_segment(&self) -> Option<&UpdatedSegment> {
        match (self.code, &self.updated_segment) {
            (Some(API_OK), Some(segment)) => Some(segment),
            _ => None,
        }
    }
}

/// `POST /routes/report-anomaly`
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyReport {
    pub user_id: String,
    pub vehicle_id: String,
    pub active_route_id: Option<String>,
    pub anomaly_lat: f64,
    pub anomaly_lon: f64,
    pub timestamp: String,
}

/// one row of `GET /admin/vehicles/live`
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LiveVehicle {
    #[serde(deserialize_with = "deserialize_id")]
    pub vehicle_id: String,
    #[serde(default)]
    pub plate: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub driver_name: Option<String>,
    #[serde(default)]
    pub last_update: Option<String>,
    #[serde(default)]
    pub is_stale: Option<bool>,
    #[serde(default)]
    pub speed_kmh: Option<f64>,
}

impl LiveVehicle {
    pub fn position(&self) -> Option<Point<f64>> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Point::new(lon, lat)),
            _ => None,
        }
    }

    pub fn in_transit(&self) -> bool {
        self.status.as_deref() == Some(IN_TRANSIT_STATUS)
    }
}

#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// `GET /admin/vehicles/{vehicleId}/context`
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VehicleContext {
    #[serde(deserialize_with = "deserialize_id")]
    pub vehicle_id: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub route_id: Option<String>,
    #[serde(default)]
    pub current_segment_index: Option<usize>,
    #[serde(default)]
    pub current_segment_polyline: Vec<LatLon>,
}

impl VehicleContext {
    pub fn polyline_points(&self) -> Vec<Point<f64>> {
        self.current_segment_polyline
            .iter()
            .map(|p| Point::new(p.lon, p.lat))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_route_metadata() {
        let meta: RouteMetadata = serde_json::from_str(
            r#"{"route": {"vehicleId": "v1", "associatedUserId": "u1", "completed": true}}"#,
        )
        .expect("metadata should decode");
        let ownership = meta.ownership();
        assert_eq!(ownership.vehicle_id.as_deref(), Some("v1"));
        assert_eq!(ownership.associated_user_id.as_deref(), Some("u1"));
        assert!(ownership.completed);
    }

    #[test]
    fn test_flat_route_metadata() {
        let meta: RouteMetadata = serde_json::from_str(
            r#"{"vehicleId": 7, "associatedUserId": "u1", "completed": false, "currentSegmentIndex": 2}"#,
        )
        .expect("metadata should decode");
        let ownership = meta.ownership();
        assert_eq!(ownership.vehicle_id.as_deref(), Some("7"));
        assert!(!ownership.completed);
        assert_eq!(ownership.current_segment_index, Some(2));
    }

    #[test]
    fn test_user_status_envelopes() {
        let nested: UserEnvelope =
            serde_json::from_str(r#"{"user": {"userStatus": "ON_ROUTE"}}"#).unwrap();
        let flat: UserEnvelope = serde_json::from_str(r#"{"userStatus": "AVAILABLE"}"#).unwrap();
        assert_eq!(nested.status().as_deref(), Some(ON_ROUTE_STATUS));
        assert_eq!(flat.status().as_deref(), Some("AVAILABLE"));
    }

    #[test]
    fn test_admin_recalculation_body_sends_null_segment_id() {
        let request = RecalculationRequest::admin(&Point::new(18.1, 40.3), "v1", "r1", 2);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "currentLat": 40.3,
                "currentLon": 18.1,
                "routeId": "r1",
                "segmentId": null,
                "vehicleId": "v1",
                "segmentIndex": 2
            })
        );
    }

    #[test]
    fn test_driver_recalculation_body() {
        let request = RecalculationRequest::driver(&Point::new(18.1, 40.3), "r1", "s1");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "currentLat": 40.3,
                "currentLon": 18.1,
                "routeId": "r1",
                "segmentId": "s1"
            })
        );
    }

    #[test]
    fn test_recalculation_response_requires_code_200() {
        let ok: RecalculationResponse = serde_json::from_str(
            r#"{"code": 200, "updatedSegment": {"geometry": [[18.1, 40.3], [18.2, 40.4]], "distanceM": 10.0, "timeS": 2.0}}"#,
        )
        .unwrap();
        assert!(ok.accepted_segment().is_some());
        let rejected: RecalculationResponse =
            serde_json::from_str(r#"{"code": 500, "message": "no path"}"#).unwrap();
        assert!(rejected.accepted_segment().is_none());
    }
}
