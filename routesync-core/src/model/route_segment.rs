use geo::Point;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::{NodeRef, StopRole};
use crate::session::SessionError;

/// one leg of a route between two stops. segments are immutable once fetched;
/// recalculation replaces the geometry and estimates through
/// [`RouteSegment::with_recalculated_path`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RouteSegment {
    pub id: String,
    pub from_label: String,
    pub to_label: String,
    pub from_node: NodeRef,
    pub to_node: NodeRef,
    /// display name of the destination.
    pub to_name: String,
    /// (x, y) = (lon, lat), at least two points.
    pub geometry: Vec<Point<f64>>,
    pub order_ids: Vec<String>,
    pub distance_m: f64,
    pub time_s: f64,
}

impl RouteSegment {
    /// builds a segment, rejecting geometries that cannot be drawn or
    /// measured. duplicate order ids are removed keeping the first occurrence.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        from_label: String,
        to_label: String,
        from_node: NodeRef,
        to_node: NodeRef,
        to_name: String,
        geometry: Vec<Point<f64>>,
        order_ids: Vec<String>,
        distance_m: f64,
        time_s: f64,
    ) -> Result<RouteSegment, SessionError> {
        if geometry.len() < 2 {
            return Err(SessionError::InvalidGeometry {
                segment_id: id,
                points: geometry.len(),
            });
        }
        Ok(RouteSegment {
            id,
            from_label,
            to_label,
            from_node,
            to_node,
            to_name,
            geometry,
            order_ids: order_ids.into_iter().unique().collect_vec(),
            distance_m,
            time_s,
        })
    }

    pub fn destination_role(&self) -> StopRole {
        StopRole::from(self.to_label.as_str())
    }

    pub fn destination(&self) -> Option<&Point<f64>> {
        self.geometry.last()
    }

    pub fn carries_order(&self, order_id: &str) -> bool {
        self.order_ids.iter().any(|o| o == order_id)
    }

    /// copy of this segment with a recalculated path. identity, endpoints
    /// and order associations are kept.
    pub fn with_recalculated_path(
        &self,
        geometry: Vec<Point<f64>>,
        distance_m: f64,
        time_s: f64,
    ) -> Result<RouteSegment, SessionError> {
        if geometry.len() < 2 {
            return Err(SessionError::InvalidGeometry {
                segment_id: self.id.clone(),
                points: geometry.len(),
            });
        }
        Ok(RouteSegment {
            geometry,
            distance_m,
            time_s,
            ..self.clone()
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// a segment with a two point geometry and the given destination label.
    pub fn mock_segment(id: &str, to_label: &str, order_ids: &[&str]) -> RouteSegment {
        RouteSegment::new(
            id.to_string(),
            String::from("Depot"),
            to_label.to_string(),
            NodeRef::parse("START_1"),
            NodeRef::parse(&format!("node-{id}")),
            format!("stop {id}"),
            vec![Point::new(18.11, 40.33), Point::new(18.12, 40.34)],
            order_ids.iter().map(|o| o.to_string()).collect(),
            1000.0,
            120.0,
        )
        .expect("test invariant failed: mock segment geometry is valid")
    }
}
