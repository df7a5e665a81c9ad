mod node_ref;
mod route_change_event;
mod route_segment;
mod stop_role;

pub use node_ref::{NodeRef, VirtualNodeKind, RESCUE_NODE_PREFIX, START_NODE_PREFIX};
pub use route_change_event::{RouteChangeEvent, RouteChangeKind};
pub use route_segment::RouteSegment;
pub use stop_role::StopRole;

#[cfg(test)]
pub(crate) use route_segment::test_support;
