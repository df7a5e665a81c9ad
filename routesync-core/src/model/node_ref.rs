use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// prefix tagging a route's starting point, which is the vehicle position
/// at planning time rather than a registered location.
pub const START_NODE_PREFIX: &str = "START_";
/// prefix tagging an insertion point added by a rescue reassignment.
pub const RESCUE_NODE_PREFIX: &str = "RESCUE_";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VirtualNodeKind {
    Start,
    Rescue,
}

/// an endpoint of a route segment. real nodes are registered locations that
/// the node service can describe; virtual nodes exist only inside a route
/// plan and must never be looked up.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum NodeRef {
    Real { id: String },
    Virtual { kind: VirtualNodeKind, label: String },
}

impl NodeRef {
    /// classifies a raw node index from the route service.
    pub fn parse(raw: &str) -> NodeRef {
        if raw.starts_with(START_NODE_PREFIX) {
            NodeRef::Virtual {
                kind: VirtualNodeKind::Start,
                label: raw.to_string(),
            }
        } else if raw.starts_with(RESCUE_NODE_PREFIX) {
            NodeRef::Virtual {
                kind: VirtualNodeKind::Rescue,
                label: raw.to_string(),
            }
        } else {
            NodeRef::Real {
                id: raw.to_string(),
            }
        }
    }

    /// the node id to resolve through the node service, if this is a real node.
    pub fn real_id(&self) -> Option<&str> {
        match self {
            NodeRef::Real { id } => Some(id),
            NodeRef::Virtual { .. } => None,
        }
    }

    pub fn is_virtual(&self) -> bool {
        matches!(self, NodeRef::Virtual { .. })
    }
}

impl Display for NodeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeRef::Real { id } => write!(f, "{id}"),
            NodeRef::Virtual { label, .. } => write!(f, "{label}"),
        }
    }
}
