use routesync_core::session::{NoSessionReason, OffRouteDecision};

use super::SessionNotice;

#[derive(Clone, Debug, PartialEq)]
pub enum RestoreOutcome {
    NoSession(NoSessionReason),
    Restored {
        route_id: String,
        segment_index: usize,
        on_route: bool,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum BootstrapOutcome {
    Adopted { route_id: String, segment_index: usize },
    /// the service has no active route for the user.
    NoActiveRoute,
    /// the lookup or the route's path failed.
    Unavailable,
}

/// why a route event was dropped without effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiscardReason {
    Malformed,
    /// the wildcard event belongs to a route of another user.
    ForeignRoute,
    OwnerUnresolved,
    /// the event arrived on a vehicle topic we no longer follow.
    ForeignVehicle,
    /// a retained event while no route is active and the driver is not on route.
    RetainedWhileIdle,
    /// not newer than the vehicle's watermark.
    Stale,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EventOutcome {
    Applied(SessionNotice),
    Discarded(DiscardReason),
}

#[derive(Clone, Debug, PartialEq)]
pub enum PositionOutcome {
    /// no active session to measure against.
    Idle,
    Tracked(OffRouteDecision),
    Recalculated { segment_id: String },
    RecalculationRejected { message: String },
    RecalculationFailed,
    /// the session moved on while the request was pending.
    RecalculationDiscarded,
}

#[derive(Clone, Debug, PartialEq)]
pub enum AdvanceOutcome {
    Advanced {
        segment_index: usize,
        destination: Option<String>,
    },
    Completed { route_id: String },
    /// the route service refused completion, the session is kept.
    CompletionRejected { message: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum AnomalyOutcome {
    Reported,
    Rejected { message: String },
}
