use std::time::{Duration, Instant};

use geo::Point;
use serde::{Deserialize, Serialize};
use uom::si::f64::Length as Distance;
use uom::si::length::meter;

use crate::util::geo_utils;

/// default distance from the planned path beyond which a vehicle is off route.
pub const DEFAULT_OFF_ROUTE_THRESHOLD_M: f64 = 50.0;
/// cooldown used by the admin live map, which polls many vehicles.
pub const ADMIN_RECALCULATION_COOLDOWN: Duration = Duration::from_secs(8);

/// configures an [`OffRouteDetector`]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OffRouteConfig {
    pub threshold_m: f64,
    /// minimum time between two triggers. None re-triggers on every sample.
    pub cooldown: Option<Duration>,
}

impl OffRouteConfig {
    /// driver-facing variant: every off-route sample may trigger.
    pub fn driver(threshold_m: f64) -> OffRouteConfig {
        OffRouteConfig {
            threshold_m,
            cooldown: None,
        }
    }

    /// admin live-map variant.
    pub fn admin(threshold_m: f64, cooldown: Duration) -> OffRouteConfig {
        OffRouteConfig {
            threshold_m,
            cooldown: Some(cooldown),
        }
    }
}

impl Default for OffRouteConfig {
    fn default() -> Self {
        OffRouteConfig::driver(DEFAULT_OFF_ROUTE_THRESHOLD_M)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum OffRouteDecision {
    /// the path has no vertices to measure against.
    NoGeometry,
    OnPath { distance: Distance },
    /// off route and a recalculation should be requested now.
    Trigger { distance: Distance },
    /// off route but inside the cooldown window of a previous trigger.
    CoolingDown { distance: Distance, remaining: Duration },
}

impl OffRouteDecision {
    pub fn should_trigger(&self) -> bool {
        matches!(self, OffRouteDecision::Trigger { .. })
    }
}

/// decides when a live position is far enough from the planned path to ask
/// the route service for a recalculation.
#[derive(Clone, Debug)]
pub struct OffRouteDetector {
    threshold: Distance,
    cooldown: Option<Duration>,
    cooldown_until: Option<Instant>,
}

impl From<&OffRouteConfig> for OffRouteDetector {
    fn from(config: &OffRouteConfig) -> Self {
        OffRouteDetector {
            threshold: Distance::new::<meter>(config.threshold_m),
            cooldown: config.cooldown,
            cooldown_until: None,
        }
    }
}

impl OffRouteDetector {
    /// evaluates one position sample against the current path. a `Trigger`
    /// decision starts the cooldown window, if any.
    pub fn evaluate(
        &mut self,
        position: &Point<f64>,
        path: &[Point<f64>],
        now: Instant,
    ) -> OffRouteDecision {
        let distance = match geo_utils::min_distance_to_path(position, path) {
            None => return OffRouteDecision::NoGeometry,
            Some(d) => d,
        };
        if distance <= self.threshold {
            return OffRouteDecision::OnPath { distance };
        }
        if let Some(until) = self.cooldown_until {
            if now < until {
                return OffRouteDecision::CoolingDown {
                    distance,
                    remaining: until - now,
                };
            }
        }
        self.cooldown_until = self.cooldown.map(|c| now + c);
        OffRouteDecision::Trigger { distance }
    }

    pub fn reset(&mut self) {
        self.cooldown_until = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn north_of(origin: &Point<f64>, d: f64) -> Point<f64> {
        let dlat = (d / 6_371_008.8_f64).to_degrees();
        Point::new(origin.x(), origin.y() + dlat)
    }

    fn path_at(origin: &Point<f64>, nearest_m: f64) -> Vec<Point<f64>> {
        vec![
            north_of(origin, nearest_m),
            north_of(origin, nearest_m + 100.0),
            north_of(origin, nearest_m + 200.0),
        ]
    }

    #[test]
    fn test_on_path() {
        let origin = Point::new(18.11, 40.33);
        let mut detector = OffRouteDetector::from(&OffRouteConfig::default());
        let decision = detector.evaluate(&origin, &path_at(&origin, 20.0), Instant::now());
        assert!(matches!(decision, OffRouteDecision::OnPath { .. }));
    }

    #[test]
    fn test_75m_triggers() {
        let origin = Point::new(18.11, 40.33);
        let mut detector = OffRouteDetector::from(&OffRouteConfig::default());
        match detector.evaluate(&origin, &path_at(&origin, 75.0), Instant::now()) {
            OffRouteDecision::Trigger { distance } => {
                assert!((distance.get::<meter>() - 75.0).abs() < 0.5)
            }
            other => panic!("expected trigger, found {other:?}"),
        }
    }

    #[test]
    fn test_driver_variant_retriggers_every_sample() {
        let origin = Point::new(18.11, 40.33);
        let path = path_at(&origin, 75.0);
        let mut detector = OffRouteDetector::from(&OffRouteConfig::driver(50.0));
        let now = Instant::now();
        assert!(detector.evaluate(&origin, &path, now).should_trigger());
        assert!(detector.evaluate(&origin, &path, now).should_trigger());
    }

    #[test]
    fn test_admin_variant_cools_down() {
        let origin = Point::new(18.11, 40.33);
        let path = path_at(&origin, 75.0);
        let mut detector = OffRouteDetector::from(&OffRouteConfig::admin(
            50.0,
            ADMIN_RECALCULATION_COOLDOWN,
        ));
        let t0 = Instant::now();
        assert!(detector.evaluate(&origin, &path, t0).should_trigger());
        let t1 = t0 + Duration::from_secs(3);
        match detector.evaluate(&origin, &path, t1) {
            OffRouteDecision::CoolingDown { remaining, .. } => {
                assert_eq!(remaining, Duration::from_secs(5))
            }
            other => panic!("expected cooldown, found {other:?}"),
        }
        let t2 = t0 + ADMIN_RECALCULATION_COOLDOWN;
        assert!(detector.evaluate(&origin, &path, t2).should_trigger());
    }

    #[test]
    fn test_empty_path() {
        let origin = Point::new(18.11, 40.33);
        let mut detector = OffRouteDetector::from(&OffRouteConfig::default());
        assert_eq!(
            detector.evaluate(&origin, &[], Instant::now()),
            OffRouteDecision::NoGeometry
        );
    }
}
