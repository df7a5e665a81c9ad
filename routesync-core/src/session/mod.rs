mod arrival;
mod off_route;
mod restore;
mod route_session;
mod session_error;
mod watermark;

pub use arrival::{plan_arrival, ArrivalPlan, ArrivalStep};
pub use off_route::{
    OffRouteConfig, OffRouteDecision, OffRouteDetector, ADMIN_RECALCULATION_COOLDOWN,
    DEFAULT_OFF_ROUTE_THRESHOLD_M,
};
pub use restore::{
    resolve_restore, DriverStatusEvidence, NoSessionReason, PersistedSession, RestoreResolution,
    RouteOwnership, SnapshotEvidence,
};
pub use route_session::{RouteSession, SessionState};
pub use session_error::SessionError;
pub use watermark::{parse_timestamp, EventWatermarks};
