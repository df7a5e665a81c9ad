use std::fmt::Display;

use routesync_core::model::RouteChangeKind;

/// a change the driver has to be told about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionNotice {
    /// the active route was re-planned.
    RouteUpdated {
        route_id: String,
        kind: RouteChangeKind,
    },
    NewRoute {
        route_id: String,
        kind: RouteChangeKind,
    },
}

impl SessionNotice {
    pub fn title(&self) -> &'static str {
        match self {
            SessionNotice::RouteUpdated { .. } => "Route updated",
            SessionNotice::NewRoute { .. } => "New route",
        }
    }
}

impl Display for SessionNotice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let body = match self {
            SessionNotice::RouteUpdated {
                kind: RouteChangeKind::Rescue,
                ..
            } => "New rescue stops were added to your route.",
            SessionNotice::RouteUpdated { .. } => "Your route has been updated.",
            SessionNotice::NewRoute {
                kind: RouteChangeKind::Rescue,
                ..
            } => "You have been assigned a rescue route.",
            SessionNotice::NewRoute { .. } => "Route accepted, let's go!",
        };
        write!(f, "{}: {body}", self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rescue_wording_differs() {
        let normal = SessionNotice::NewRoute {
            route_id: String::from("r1"),
            kind: RouteChangeKind::Normal,
        };
        let rescue = SessionNotice::NewRoute {
            route_id: String::from("r1"),
            kind: RouteChangeKind::Rescue,
        };
        assert_ne!(normal.to_string(), rescue.to_string());
        assert!(rescue.to_string().contains("rescue"));
    }
}
