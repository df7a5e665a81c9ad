use async_trait::async_trait;

use super::dto::{
    ActiveRoute, AnomalyReport, ApiResponse, LiveVehicle, NodeInfo, RealPathRow,
    RecalculationRequest, RecalculationResponse, RouteMetadata, VehicleContext,
};
use super::ClientError;

/// the delivery backend as seen by the route session. every call is a single
/// request/response exchange; nothing is retried here.
#[async_trait]
pub trait RouteBackend: Send + Sync {
    /// the user's active route, or None when the service answers 404.
    async fn active_route(&self, user_id: &str) -> Result<Option<ActiveRoute>, ClientError>;

    async fn route_metadata(&self, route_id: &str) -> Result<RouteMetadata, ClientError>;

    /// raw segment rows of a route, in traversal order.
    async fn real_path(&self, route_id: &str) -> Result<Vec<RealPathRow>, ClientError>;

    async fn node(&self, node_id: &str) -> Result<NodeInfo, ClientError>;

    /// the `userStatus` of a driver, when the service reports one.
    async fn driver_status(&self, user_id: &str) -> Result<Option<String>, ClientError>;

    async fn update_progress(&self, route_id: &str, segment_index: usize)
        -> Result<(), ClientError>;

    /// a non-success http status is reported as the response code.
    async fn complete_route(&self, route_id: &str) -> Result<ApiResponse, ClientError>;

    async fn recalculate_route(
        &self,
        request: &RecalculationRequest,
    ) -> Result<RecalculationResponse, ClientError>;

    async fn report_anomaly(&self, report: &AnomalyReport) -> Result<ApiResponse, ClientError>;

    async fn mark_delivered(&self, order_id: &str) -> Result<(), ClientError>;

    async fn mark_picked_up(&self, order_id: &str) -> Result<(), ClientError>;

    async fn live_vehicles(&self) -> Result<Vec<LiveVehicle>, ClientError>;

    async fn vehicle_context(&self, vehicle_id: &str) -> Result<VehicleContext, ClientError>;
}
