use std::fmt::Display;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteChangeKind {
    #[default]
    Normal,
    Rescue,
}

impl From<Option<&str>> for RouteChangeKind {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some("rescue") => RouteChangeKind::Rescue,
            _ => RouteChangeKind::Normal,
        }
    }
}

impl Display for RouteChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteChangeKind::Normal => write!(f, "normal"),
            RouteChangeKind::Rescue => write!(f, "rescue"),
        }
    }
}

/// a route-change notification taken off the event stream. consumed once.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteChangeEvent {
    pub route_id: String,
    pub kind: RouteChangeKind,
    pub timestamp: DateTime<FixedOffset>,
    /// true when the broker replayed a stored message on (re)subscribe.
    pub retained: bool,
    /// vehicle id read from the topic the event arrived on.
    pub topic_vehicle_id: String,
}
