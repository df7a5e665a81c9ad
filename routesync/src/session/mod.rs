mod manager;
mod outcome;
mod session_notice;
mod session_status;


pub use manager::RouteSessionManager;
pub use outcome::{
    AdvanceOutcome, AnomalyOutcome, BootstrapOutcome, DiscardReason, EventOutcome,
    PositionOutcome, RestoreOutcome,
};
pub use session_notice::SessionNotice;
pub use session_status::SessionStatus;
