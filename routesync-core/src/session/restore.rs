use serde::{Deserialize, Serialize};

/// session fields as read back from the device store.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct PersistedSession {
    pub active_route_id: Option<String>,
    /// None when absent or unparseable.
    pub current_segment_index: Option<usize>,
    pub vehicle_id: Option<String>,
    pub on_route: bool,
}

/// ownership record of a route as served by the backend.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RouteOwnership {
    pub associated_user_id: Option<String>,
    pub vehicle_id: Option<String>,
    pub completed: bool,
    pub current_segment_index: Option<usize>,
}

/// what the backend said about the persisted route.
#[derive(Clone, Debug, PartialEq)]
pub enum SnapshotEvidence {
    /// the lookup failed (network, 4xx, undecodable body).
    Unavailable,
    Fetched(RouteOwnership),
}

/// live driver status reported by the user service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverStatusEvidence {
    OnRoute,
    NotOnRoute,
    Unavailable,
}

impl DriverStatusEvidence {
    pub fn is_on_route(&self) -> bool {
        matches!(self, DriverStatusEvidence::OnRoute)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoSessionReason {
    NothingPersisted,
    SnapshotUnavailable,
    ForeignRoute,
    RouteCompleted,
    /// the route was valid but its segments could not be loaded.
    PathUnavailable,
}

#[derive(Clone, Debug, PartialEq)]
pub enum RestoreResolution {
    NoSession {
        reason: NoSessionReason,
        /// persisted session keys must be removed.
        clear_persisted: bool,
    },
    Adopt {
        route_id: String,
        vehicle_id: Option<String>,
        segment_index: usize,
        on_route: bool,
    },
}

/// merges the three sources of truth for a restored session: the device
/// store, the route's ownership record and the live driver status.
///
/// any evidence that the persisted route is not ours to resume wins over the
/// cached pointer. driver status only decides whether the session counts as
/// on route.
///
/// # Arguments
///
/// * `persisted` - values read from the device store
/// * `snapshot` - ownership lookup for the persisted route, None when nothing was looked up
/// * `status` - live driver status
/// * `current_user_id` - the signed in user
pub fn resolve_restore(
    persisted: &PersistedSession,
    snapshot: Option<&SnapshotEvidence>,
    status: DriverStatusEvidence,
    current_user_id: &str,
) -> RestoreResolution {
    let route_id = match &persisted.active_route_id {
        None => {
            return RestoreResolution::NoSession {
                reason: NoSessionReason::NothingPersisted,
                clear_persisted: false,
            }
        }
        Some(id) => id,
    };
    let ownership = match snapshot {
        None | Some(SnapshotEvidence::Unavailable) => {
            return RestoreResolution::NoSession {
                reason: NoSessionReason::SnapshotUnavailable,
                clear_persisted: true,
            }
        }
        Some(SnapshotEvidence::Fetched(ownership)) => ownership,
    };
    if ownership.associated_user_id.as_deref() != Some(current_user_id) {
        return RestoreResolution::NoSession {
            reason: NoSessionReason::ForeignRoute,
            clear_persisted: true,
        };
    }
    if ownership.completed {
        return RestoreResolution::NoSession {
            reason: NoSessionReason::RouteCompleted,
            clear_persisted: true,
        };
    }
    RestoreResolution::Adopt {
        route_id: route_id.clone(),
        vehicle_id: persisted
            .vehicle_id
            .clone()
            .or_else(|| ownership.vehicle_id.clone()),
        segment_index: persisted
            .current_segment_index
            .or(ownership.current_segment_index)
            .unwrap_or(0),
        on_route: status.is_on_route(),
    }
}
