use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use geo::Point;

use super::dto::{
    ActiveRoute, AnomalyReport, ApiResponse, LiveVehicle, NodeInfo, RealPathRow,
    RecalculationRequest, RecalculationResponse, RouteMetadata, RouteMetadataFields,
    UpdatedSegment, VehicleContext, API_OK,
};
use super::{ClientError, RouteBackend};

/// in-memory backend. unknown routes answer 404, every call is recorded.
#[derive(Debug, Default)]
pub struct FakeBackend {
    pub metadata: Mutex<HashMap<String, RouteMetadata>>,
    pub paths: Mutex<HashMap<String, Vec<RealPathRow>>>,
    /// None makes the status lookup fail.
    pub driver_status: Mutex<Option<String>>,
    pub active: Mutex<Option<ActiveRoute>>,
    pub complete_response: Mutex<Option<ApiResponse>>,
    pub recalculation_response: Mutex<Option<RecalculationResponse>>,
    /// how long a recalculation stays pending before it answers.
    pub recalculation_delay: Mutex<Option<Duration>>,
    pub anomaly_response: Mutex<Option<ApiResponse>>,
    pub live: Mutex<Vec<LiveVehicle>>,
    pub contexts: Mutex<HashMap<String, VehicleContext>>,
    pub calls: Mutex<Vec<String>>,
    pub recalculations: Mutex<Vec<RecalculationRequest>>,
    pub anomalies: Mutex<Vec<AnomalyReport>>,
}

pub fn not_found(what: &str) -> ClientError {
    ClientError::UnexpectedStatus {
        url: what.to_string(),
        status: 404,
        body: String::new(),
    }
}

pub fn ok_response() -> ApiResponse {
    ApiResponse {
        code: Some(API_OK),
        message: Some(String::from("ok")),
    }
}

pub fn route_metadata(owner: &str, vehicle_id: &str, completed: bool) -> RouteMetadata {
    RouteMetadata {
        fields: RouteMetadataFields {
            vehicle_id: Some(vehicle_id.to_string()),
            associated_user_id: Some(owner.to_string()),
            completed: Some(completed),
            current_segment_index: None,
        },
        route: None,
    }
}

/// a realpath row whose geometry is two points starting at `origin`.
pub fn path_row(id: &str, to_label: &str, order_ids: &[&str], origin: Point<f64>) -> RealPathRow {
    path_row_with_geometry(
        id,
        to_label,
        order_ids,
        vec![origin, Point::new(origin.x() + 0.001, origin.y() + 0.001)],
    )
}

pub fn path_row_with_geometry(
    id: &str,
    to_label: &str,
    order_ids: &[&str],
    geometry: Vec<Point<f64>>,
) -> RealPathRow {
    RealPathRow {
        id: id.to_string(),
        geometry: Some(geometry.iter().map(|p| [p.x(), p.y()]).collect()),
        from_label: None,
        to_label: Some(to_label.to_string()),
        from_node_index: None,
        to_node_index: Some(format!("RESCUE_{id}")),
        order_ids: order_ids.iter().map(|o| o.to_string()).collect(),
        distance_m: Some(100.0),
        time_s: Some(60.0),
    }
}

pub fn accepted_recalculation(geometry: Vec<Point<f64>>) -> RecalculationResponse {
    RecalculationResponse {
        code: Some(API_OK),
        message: None,
        updated_segment: Some(UpdatedSegment {
            geometry: geometry.iter().map(|p| [p.x(), p.y()]).collect(),
            distance_m: Some(42.0),
            time_s: Some(7.0),
        }),
    }
}

impl FakeBackend {
    pub fn with_route(self, route_id: &str, metadata: RouteMetadata, rows: Vec<RealPathRow>) -> Self {
        self.metadata
            .lock()
            .expect("test lock")
            .insert(route_id.to_string(), metadata);
        self.paths
            .lock()
            .expect("test lock")
            .insert(route_id.to_string(), rows);
        self
    }

    pub fn with_driver_status(self, status: Option<&str>) -> Self {
        *self.driver_status.lock().expect("test lock") = status.map(String::from);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("test lock").clone()
    }

    pub fn calls_matching(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("test lock").push(call);
    }
}

#[async_trait]
impl RouteBackend for FakeBackend {
    async fn active_route(&self, user_id: &str) -> Result<Option<ActiveRoute>, ClientError> {
        self.record(format!("active {user_id}"));
        Ok(self.active.lock().expect("test lock").clone())
    }

    async fn route_metadata(&self, route_id: &str) -> Result<RouteMetadata, ClientError> {
        self.record(format!("metadata {route_id}"));
        self.metadata
            .lock()
            .expect("test lock")
            .get(route_id)
            .cloned()
            .ok_or_else(|| not_found(route_id))
    }

    async fn real_path(&self, route_id: &str) -> Result<Vec<RealPathRow>, ClientError> {
        self.record(format!("realpath {route_id}"));
        self.paths
            .lock()
            .expect("test lock")
            .get(route_id)
            .cloned()
            .ok_or_else(|| not_found(route_id))
    }

    async fn node(&self, node_id: &str) -> Result<NodeInfo, ClientError> {
        self.record(format!("node {node_id}"));
        Err(not_found(node_id))
    }

    async fn driver_status(&self, user_id: &str) -> Result<Option<String>, ClientError> {
        self.record(format!("status {user_id}"));
        match self.driver_status.lock().expect("test lock").clone() {
            Some(status) => Ok(Some(status)),
            None => Err(not_found(user_id)),
        }
    }

    async fn update_progress(
        &self,
        route_id: &str,
        segment_index: usize,
    ) -> Result<(), ClientError> {
        self.record(format!("progress {route_id} {segment_index}"));
        Ok(())
    }

    async fn complete_route(&self, route_id: &str) -> Result<ApiResponse, ClientError> {
        self.record(format!("complete {route_id}"));
        Ok(self
            .complete_response
            .lock()
            .expect("test lock")
            .clone()
            .unwrap_or_else(ok_response))
    }

    async fn recalculate_route(
        &self,
        request: &RecalculationRequest,
    ) -> Result<RecalculationResponse, ClientError> {
        self.record(format!("recalculate {}", request.route_id));
        self.recalculations
            .lock()
            .expect("test lock")
            .push(request.clone());
        let delay = *self.recalculation_delay.lock().expect("test lock");
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.recalculation_response
            .lock()
            .expect("test lock")
            .clone()
            .ok_or_else(|| not_found("recalculate-route"))
    }

    async fn report_anomaly(&self, report: &AnomalyReport) -> Result<ApiResponse, ClientError> {
        self.record(format!("anomaly {}", report.vehicle_id));
        self.anomalies.lock().expect("test lock").push(report.clone());
        Ok(self
            .anomaly_response
            .lock()
            .expect("test lock")
            .clone()
            .unwrap_or_else(ok_response))
    }

    async fn mark_delivered(&self, order_id: &str) -> Result<(), ClientError> {
        self.record(format!("delivered {order_id}"));
        Ok(())
    }

    async fn mark_picked_up(&self, order_id: &str) -> Result<(), ClientError> {
        self.record(format!("picked_up {order_id}"));
        Ok(())
    }

    async fn live_vehicles(&self) -> Result<Vec<LiveVehicle>, ClientError> {
        self.record(String::from("live"));
        Ok(self.live.lock().expect("test lock").clone())
    }

    async fn vehicle_context(&self, vehicle_id: &str) -> Result<VehicleContext, ClientError> {
        self.record(format!("context {vehicle_id}"));
        self.contexts
            .lock()
            .expect("test lock")
            .get(vehicle_id)
            .cloned()
            .ok_or_else(|| not_found(vehicle_id))
    }
}
