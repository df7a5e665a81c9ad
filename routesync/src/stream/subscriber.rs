use std::fmt::Display;

use super::topic::{route_started_topic, ROUTE_STARTED_WILDCARD};
use super::{PubSubChannel, StreamError};

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum SubscriptionState {
    #[default]
    Unsubscribed,
    /// listening on every vehicle until ours is known.
    Wildcard,
    Specific { vehicle_id: String },
}

impl Display for SubscriptionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionState::Unsubscribed => write!(f, "unsubscribed"),
            SubscriptionState::Wildcard => write!(f, "{ROUTE_STARTED_WILDCARD}"),
            SubscriptionState::Specific { vehicle_id } => {
                write!(f, "{}", route_started_topic(vehicle_id))
            }
        }
    }
}

/// tracks which route event topic we listen on.
#[derive(Clone, Debug, Default)]
pub struct EventSubscriber {
    state: SubscriptionState,
}

impl EventSubscriber {
    pub fn state(&self) -> &SubscriptionState {
        &self.state
    }

    /// subscribes to the vehicle's topic when the vehicle is known, otherwise
    /// to the wildcard. a no-op when already on the right topic.
    pub async fn subscribe<P>(
        &mut self,
        channel: &P,
        vehicle_id: Option<&str>,
    ) -> Result<(), StreamError>
    where
        P: PubSubChannel + ?Sized,
    {
        let on_topic = match (vehicle_id, &self.state) {
            (Some(vid), SubscriptionState::Specific { vehicle_id }) => vid == vehicle_id.as_str(),
            (None, SubscriptionState::Wildcard) => true,
            _ => false,
        };
        if on_topic {
            return Ok(());
        }
        match vehicle_id {
            Some(vid) => self.switch_to_specific(channel, vid).await,
            None => {
                self.unsubscribe_current(channel).await?;
                channel.subscribe(ROUTE_STARTED_WILDCARD).await?;
                self.state = SubscriptionState::Wildcard;
                Ok(())
            }
        }
    }

    /// leaves the current topic and listens on `vehicle_id` only.
    pub async fn switch_to_specific<P>(
        &mut self,
        channel: &P,
        vehicle_id: &str,
    ) -> Result<(), StreamError>
    where
        P: PubSubChannel + ?Sized,
    {
        self.unsubscribe_current(channel).await?;
        channel.subscribe(&route_started_topic(vehicle_id)).await?;
        log::info!("listening for route events of vehicle {vehicle_id}");
        self.state = SubscriptionState::Specific {
            vehicle_id: vehicle_id.to_string(),
        };
        Ok(())
    }

    /// the broker dropped our subscriptions with the connection.
    pub fn mark_disconnected(&mut self) {
        self.state = SubscriptionState::Unsubscribed;
    }

    pub async fn teardown<P>(&mut self, channel: &P) -> Result<(), StreamError>
    where
        P: PubSubChannel + ?Sized,
    {
        self.unsubscribe_current(channel).await
    }

    async fn unsubscribe_current<P>(&mut self, channel: &P) -> Result<(), StreamError>
    where
        P: PubSubChannel + ?Sized,
    {
        let topic = match &self.state {
            SubscriptionState::Unsubscribed => return Ok(()),
            SubscriptionState::Wildcard => ROUTE_STARTED_WILDCARD.to_string(),
            SubscriptionState::Specific { vehicle_id } => route_started_topic(vehicle_id),
        };
        self.state = SubscriptionState::Unsubscribed;
        channel.unsubscribe(&topic).await
    }
}
