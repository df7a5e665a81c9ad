use std::fmt::Display;
use std::sync::Arc;
use std::time::{Duration, Instant};

use geo::Point;
use routesync_core::session::{OffRouteConfig, OffRouteDecision, OffRouteDetector};
use uom::si::length::meter;

use crate::client::dto::{lon_lat_points, RecalculationRequest};
use crate::client::{ClientError, RouteBackend};

/// the path the monitor currently measures against.
#[derive(Clone, Debug, PartialEq)]
struct TrackedSegment {
    route_id: String,
    segment_index: usize,
    polyline: Vec<Point<f64>>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MonitorReport {
    /// the vehicle is not in the live feed.
    VehicleMissing,
    /// not in transit, the vehicle is parked at the depot.
    AtDepot,
    NoPosition,
    /// the vehicle context lacks a route, a segment or a drawable polyline.
    NoContext,
    Tracked {
        route_id: String,
        segment_index: usize,
        decision: OffRouteDecision,
    },
    Recalculated {
        route_id: String,
        segment_index: usize,
        points: usize,
    },
    RecalculationRejected { message: String },
    RecalculationFailed { message: String },
}

impl Display for MonitorReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonitorReport::VehicleMissing => write!(f, "vehicle not reporting"),
            MonitorReport::AtDepot => write!(f, "at depot"),
            MonitorReport::NoPosition => write!(f, "in transit, no position"),
            MonitorReport::NoContext => write!(f, "in transit, no route context"),
            MonitorReport::Tracked {
                route_id,
                segment_index,
                decision,
            } => {
                write!(f, "route {route_id} segment {segment_index}: ")?;
                match decision {
                    OffRouteDecision::NoGeometry => write!(f, "no geometry"),
                    OffRouteDecision::OnPath { distance } => {
                        write!(f, "on path ({:.0} m)", distance.get::<meter>())
                    }
                    OffRouteDecision::Trigger { distance } => {
                        write!(f, "off route ({:.0} m)", distance.get::<meter>())
                    }
                    OffRouteDecision::CoolingDown {
                        distance,
                        remaining,
                    } => {
                        let remaining = Duration::from_secs(remaining.as_secs());
                        write!(
                            f,
                            "off route ({:.0} m), next recalculation in {}",
                            distance.get::<meter>(),
                            humantime::format_duration(remaining)
                        )
                    }
                }
            }
            MonitorReport::Recalculated {
                route_id,
                segment_index,
                points,
            } => write!(
                f,
                "route {route_id} segment {segment_index}: recalculated, {points} points"
            ),
            MonitorReport::RecalculationRejected { message } => {
                write!(f, "recalculation rejected: {message}")
            }
            MonitorReport::RecalculationFailed { message } => {
                write!(f, "recalculation failed: {message}")
            }
        }
    }
}

/// watches one vehicle on the admin live feed and asks for a new path when
/// it strays from its current segment.
pub struct LiveMonitor<B> {
    backend: Arc<B>,
    vehicle_id: String,
    detector: OffRouteDetector,
    tracked: Option<TrackedSegment>,
}

impl<B: RouteBackend> LiveMonitor<B> {
    pub fn new(backend: Arc<B>, vehicle_id: &str, off_route: &OffRouteConfig) -> LiveMonitor<B> {
        LiveMonitor {
            backend,
            vehicle_id: vehicle_id.to_string(),
            detector: OffRouteDetector::from(off_route),
            tracked: None,
        }
    }

    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }

    /// one polling round.
    pub async fn poll(&mut self) -> Result<MonitorReport, ClientError> {
        let vehicles = self.backend.live_vehicles().await?;
        let vehicle = match vehicles
            .into_iter()
            .find(|v| v.vehicle_id == self.vehicle_id)
        {
            Some(v) => v,
            None => return Ok(MonitorReport::VehicleMissing),
        };
        if !vehicle.in_transit() {
            self.tracked = None;
            self.detector.reset();
            return Ok(MonitorReport::AtDepot);
        }
        let position = match vehicle.position() {
            Some(p) => p,
            None => return Ok(MonitorReport::NoPosition),
        };

        let context = self.backend.vehicle_context(&self.vehicle_id).await?;
        let polyline = context.polyline_points();
        let (route_id, segment_index) = match (context.route_id, context.current_segment_index) {
            (Some(r), Some(i)) if polyline.len() >= 2 => (r, i),
            _ => return Ok(MonitorReport::NoContext),
        };
        let tracked = match self.tracked.take() {
            Some(t) if t.route_id == route_id && t.segment_index == segment_index => t,
            _ => TrackedSegment {
                route_id: route_id.clone(),
                segment_index,
                polyline,
            },
        };
        let decision = self
            .detector
            .evaluate(&position, &tracked.polyline, Instant::now());
        self.tracked = Some(tracked);
        if !decision.should_trigger() {
            return Ok(MonitorReport::Tracked {
                route_id,
                segment_index,
                decision,
            });
        }

        log::warn!(
            "vehicle {} off segment {segment_index} of route {route_id}, requesting a new path",
            self.vehicle_id
        );
        let request =
            RecalculationRequest::admin(&position, &self.vehicle_id, &route_id, segment_index);
        let response = match self.backend.recalculate_route(&request).await {
            Ok(r) => r,
            Err(e) => {
                log::warn!("recalculation for vehicle {} failed: {e}", self.vehicle_id);
                return Ok(MonitorReport::RecalculationFailed {
                    message: e.to_string(),
                });
            }
        };
        match response.accepted_segment() {
            Some(updated) if !updated.geometry.is_empty() => {
                let points = lon_lat_points(&updated.geometry);
                let count = points.len();
                self.tracked = Some(TrackedSegment {
                    route_id: route_id.clone(),
                    segment_index,
                    polyline: points,
                });
                Ok(MonitorReport::Recalculated {
                    route_id,
                    segment_index,
                    points: count,
                })
            }
            _ => Ok(MonitorReport::RecalculationRejected {
                message: response
                    .message
                    .clone()
                    .unwrap_or_else(|| String::from("no updated segment")),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::dto::{LatLon, LiveVehicle, RecalculationResponse, VehicleContext};
    use crate::client::test_support::{accepted_recalculation, FakeBackend};
    use routesync_core::session::ADMIN_RECALCULATION_COOLDOWN;

    fn live(status: &str, lat: f64, lon: f64) -> LiveVehicle {
        LiveVehicle {
            vehicle_id: String::from("v1"),
            plate: Some(String::from("AB123CD")),
            status: Some(status.to_string()),
            lat: Some(lat),
            lon: Some(lon),
            driver_name: None,
            last_update: None,
            is_stale: Some(false),
            speed_kmh: Some(30.0),
        }
    }

    fn context() -> VehicleContext {
        VehicleContext {
            vehicle_id: String::from("v1"),
            route_id: Some(String::from("r1")),
            current_segment_index: Some(2),
            current_segment_polyline: vec![
                LatLon {
                    lat: 40.35,
                    lon: 18.17,
                },
                LatLon {
                    lat: 40.35,
                    lon: 18.18,
                },
            ],
        }
    }

    /// about 75 m north of the polyline's first vertex.
    const OFF_LAT: f64 = 40.350_674_5;

    fn monitor(backend: FakeBackend) -> (Arc<FakeBackend>, LiveMonitor<FakeBackend>) {
        let backend = Arc::new(backend);
        let monitor = LiveMonitor::new(
            backend.clone(),
            "v1",
            &OffRouteConfig::admin(50.0, ADMIN_RECALCULATION_COOLDOWN),
        );
        (backend, monitor)
    }

    #[tokio::test]
    async fn test_parked_vehicle_is_at_depot() {
        let backend = FakeBackend::default();
        *backend.live.lock().unwrap() = vec![live("AVAILABLE", 40.35, 18.17)];
        let (backend, mut monitor) = monitor(backend);
        assert_eq!(monitor.poll().await.unwrap(), MonitorReport::AtDepot);
        assert!(backend.calls_matching("context").is_empty());
    }

    #[tokio::test]
    async fn test_off_route_vehicle_is_recalculated() {
        let backend = FakeBackend::default();
        *backend.live.lock().unwrap() = vec![live("IN_TRANSIT", OFF_LAT, 18.17)];
        backend
            .contexts
            .lock()
            .unwrap()
            .insert(String::from("v1"), context());
        *backend.recalculation_response.lock().unwrap() = Some(accepted_recalculation(vec![
            Point::new(18.17, OFF_LAT),
            Point::new(18.18, 40.35),
            Point::new(18.19, 40.35),
        ]));
        let (backend, mut monitor) = monitor(backend);

        let report = monitor.poll().await.unwrap();

        assert_eq!(
            report,
            MonitorReport::Recalculated {
                route_id: String::from("r1"),
                segment_index: 2,
                points: 3
            }
        );
        let requests = backend.recalculations.lock().unwrap().clone();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].vehicle_id.as_deref(), Some("v1"));
        assert_eq!(requests[0].segment_index, Some(2));
        assert_eq!(requests[0].segment_id, None);

        let next = monitor.poll().await.unwrap();
        assert!(matches!(
            next,
            MonitorReport::Tracked {
                decision: OffRouteDecision::OnPath { .. },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_cooldown_limits_requests() {
        let backend = FakeBackend::default();
        *backend.live.lock().unwrap() = vec![live("IN_TRANSIT", OFF_LAT, 18.17)];
        backend
            .contexts
            .lock()
            .unwrap()
            .insert(String::from("v1"), context());
        *backend.recalculation_response.lock().unwrap() = Some(RecalculationResponse {
            code: Some(500),
            message: Some(String::from("no path")),
            updated_segment: None,
        });
        let (backend, mut monitor) = monitor(backend);

        let first = monitor.poll().await.unwrap();
        let second = monitor.poll().await.unwrap();

        assert_eq!(
            first,
            MonitorReport::RecalculationRejected {
                message: String::from("no path")
            }
        );
        assert!(matches!(
            second,
            MonitorReport::Tracked {
                decision: OffRouteDecision::CoolingDown { .. },
                ..
            }
        ));
        assert_eq!(backend.recalculations.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_vehicle() {
        let (_, mut monitor) = monitor(FakeBackend::default());
        assert_eq!(monitor.poll().await.unwrap(), MonitorReport::VehicleMissing);
    }
}
