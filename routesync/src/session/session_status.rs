use std::fmt::Display;
use std::time::Duration;

use routesync_core::session::SessionState;

use crate::stream::SubscriptionState;

/// a read-only view of the manager for display.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionStatus {
    pub state: SessionState,
    pub route_id: Option<String>,
    pub vehicle_id: Option<String>,
    pub segment_index: usize,
    pub segment_count: usize,
    pub on_route: bool,
    pub destination: Option<String>,
    pub segment_time_s: Option<f64>,
    pub distance_to_destination_m: Option<f64>,
    pub near_destination: bool,
    pub subscription: SubscriptionState,
}

impl Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let route = match (&self.state, &self.route_id) {
            (SessionState::Active, Some(route_id)) => route_id.as_str(),
            _ => return write!(f, "no active route (subscription: {})", self.subscription),
        };
        writeln!(
            f,
            "route {route}, segment {}/{}, vehicle {}, on route: {}",
            self.segment_index + 1,
            self.segment_count,
            self.vehicle_id.as_deref().unwrap_or("unknown"),
            self.on_route
        )?;
        if let Some(destination) = &self.destination {
            write!(f, "next stop: {destination}")?;
            if let Some(t) = self.segment_time_s.filter(|t| t.is_finite() && *t > 0.0) {
                let eta = humantime::format_duration(Duration::from_secs(t.round() as u64));
                write!(f, " (planned {eta})")?;
            }
            writeln!(f)?;
        }
        if let Some(d) = self.distance_to_destination_m {
            let near = if self.near_destination { ", arrived" } else { "" };
            writeln!(f, "distance to stop: {d:.0} m{near}")?;
        }
        write!(f, "subscription: {}", self.subscription)
    }
}
