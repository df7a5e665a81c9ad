use geo::Point;
use serde::{Deserialize, Serialize};
use uom::si::f64::Length as Distance;

use super::{EventWatermarks, SessionError};
use crate::model::RouteSegment;
use crate::util::geo_utils;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    NoSession,
    Active,
}

/// the driver's progress along a route. owned by a single session manager,
/// which is the only writer.
///
/// `generation` is bumped whenever the session is cleared or a different
/// route is adopted. work started against one generation must not be applied
/// to another.
#[derive(Clone, Debug, Default)]
pub struct RouteSession {
    active_route_id: Option<String>,
    vehicle_id: Option<String>,
    current_segment_index: usize,
    segments: Vec<RouteSegment>,
    on_route: bool,
    pub watermarks: EventWatermarks,
    generation: u64,
}

impl RouteSession {
    pub fn state(&self) -> SessionState {
        match (&self.active_route_id, self.segments.is_empty()) {
            (Some(_), false) => SessionState::Active,
            _ => SessionState::NoSession,
        }
    }

    pub fn active_route_id(&self) -> Option<&str> {
        self.active_route_id.as_deref()
    }

    pub fn vehicle_id(&self) -> Option<&str> {
        self.vehicle_id.as_deref()
    }

    pub fn current_segment_index(&self) -> usize {
        self.current_segment_index
    }

    pub fn segments(&self) -> &[RouteSegment] {
        &self.segments
    }

    pub fn on_route(&self) -> bool {
        self.on_route
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current_segment(&self) -> Option<&RouteSegment> {
        self.segments.get(self.current_segment_index)
    }

    /// points the session at a route. a different route id starts a new
    /// generation and drops the previous segments.
    pub fn adopt_route(&mut self, route_id: &str) {
        if self.active_route_id.as_deref() != Some(route_id) {
            self.active_route_id = Some(route_id.to_string());
            self.segments.clear();
            self.generation += 1;
        }
    }

    pub fn set_vehicle_id(&mut self, vehicle_id: Option<String>) {
        self.vehicle_id = vehicle_id;
    }

    pub fn set_on_route(&mut self, on_route: bool) {
        self.on_route = on_route;
    }

    /// replaces the whole segment sequence, keeping the index and clamping it
    /// when the sequence shrank below it.
    pub fn replace_segments(&mut self, segments: Vec<RouteSegment>) {
        self.segments = segments;
        self.clamp_segment_index();
    }

    /// sets the index, clamped to the last segment.
    pub fn set_current_segment_index(&mut self, index: usize) {
        self.current_segment_index = index;
        self.clamp_segment_index();
    }

    /// returns true when the index changed.
    pub fn clamp_segment_index(&mut self) -> bool {
        let bound = self.segments.len().saturating_sub(1);
        if self.current_segment_index > bound {
            log::debug!(
                "clamping segment index {} to {bound} for {} segment(s)",
                self.current_segment_index,
                self.segments.len()
            );
            self.current_segment_index = bound;
            true
        } else {
            false
        }
    }

    /// replaces the path of the segment at `index` if it still holds
    /// `segment_id`. returns false when the segment is no longer there.
    pub fn replace_segment_path(
        &mut self,
        index: usize,
        segment_id: &str,
        geometry: Vec<Point<f64>>,
        distance_m: f64,
        time_s: f64,
    ) -> Result<bool, SessionError> {
        match self.segments.get(index) {
            Some(segment) if segment.id == segment_id => {
                let updated = segment.with_recalculated_path(geometry, distance_m, time_s)?;
                self.segments[index] = updated;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// distance from `position` to the current segment's destination.
    pub fn distance_to_destination(&self, position: &Point<f64>) -> Option<Distance> {
        self.current_segment()
            .and_then(|s| s.destination())
            .map(|d| geo_utils::haversine_distance(position, d))
    }

    /// starts a new generation without touching the session, so that work
    /// started before this call is not applied.
    pub fn invalidate_pending(&mut self) {
        self.generation += 1;
    }

    /// resets every field to its initial value and starts a new generation.
    /// the watermark of the session's vehicle is dropped so that the next
    /// assignment for it is not mistaken for a replay.
    pub fn clear(&mut self) {
        if let Some(vid) = self.vehicle_id.take() {
            self.watermarks.remove(&vid);
        }
        self.active_route_id = None;
        self.current_segment_index = 0;
        self.segments.clear();
        self.on_route = false;
        self.generation += 1;
    }
}
