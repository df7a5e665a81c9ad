use chrono::{DateTime, SecondsFormat, Utc};
use geo::Point;
use serde::Serialize;

use super::topic::position_topic;
use super::{PubSubChannel, StreamError};

/// body of a `vehicle/{id}/position` message.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PositionReport {
    pub lat: f64,
    pub lon: f64,
    pub timestamp: String,
}

impl PositionReport {
    pub fn new(position: &Point<f64>, at: DateTime<Utc>) -> PositionReport {
        PositionReport {
            lat: position.y(),
            lon: position.x(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// publishes one position sample of `vehicle_id`.
pub async fn publish_position<P>(
    channel: &P,
    vehicle_id: &str,
    position: &Point<f64>,
    at: DateTime<Utc>,
) -> Result<(), StreamError>
where
    P: PubSubChannel + ?Sized,
{
    let payload = serde_json::to_vec(&PositionReport::new(position, at))?;
    channel.publish(&position_topic(vehicle_id), payload).await
}
