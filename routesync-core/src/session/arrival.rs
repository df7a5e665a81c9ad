use itertools::Itertools;

use super::SessionError;
use crate::model::{RouteSegment, StopRole};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ArrivalStep {
    /// move the progress pointer to `next_index`.
    Advance { next_index: usize },
    /// the last segment was reached, the route should be completed.
    Complete,
}

/// the side effects of confirming arrival at the current segment's destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArrivalPlan {
    pub segment_id: String,
    pub role: StopRole,
    /// orders to mark as picked up, in segment order.
    pub pickups: Vec<String>,
    /// orders to mark as delivered. only orders picked up on an earlier
    /// segment are included.
    pub deliveries: Vec<String>,
    pub step: ArrivalStep,
}

/// plans the arrival at `segments[index]`.
///
/// # Arguments
///
/// * `segments` - the route's segments in traversal order
/// * `index` - the segment whose destination was reached
///
/// # Returns
///
/// * the plan, or an error when `index` is out of range
pub fn plan_arrival(segments: &[RouteSegment], index: usize) -> Result<ArrivalPlan, SessionError> {
    let segment = segments
        .get(index)
        .ok_or(SessionError::SegmentIndexOutOfRange {
            index,
            len: segments.len(),
        })?;
    let role = segment.destination_role();
    let pickups = match role {
        StopRole::Pickup => segment.order_ids.clone(),
        _ => vec![],
    };
    let deliveries = match role {
        StopRole::Delivery => segment
            .order_ids
            .iter()
            .filter(|order_id| was_picked_up_before(segments, index, order_id))
            .cloned()
            .collect_vec(),
        _ => vec![],
    };
    let step = if index + 1 < segments.len() {
        ArrivalStep::Advance {
            next_index: index + 1,
        }
    } else {
        ArrivalStep::Complete
    };
    Ok(ArrivalPlan {
        segment_id: segment.id.clone(),
        role,
        pickups,
        deliveries,
        step,
    })
}

/// true if a segment strictly before `index` ends at a pickup carrying `order_id`.
fn was_picked_up_before(segments: &[RouteSegment], index: usize, order_id: &str) -> bool {
    segments[..index]
        .iter()
        .any(|s| s.destination_role() == StopRole::Pickup && s.carries_order(order_id))
}
