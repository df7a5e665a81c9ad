use std::sync::Arc;
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use geo::Point;
use routesync_core::model::{RouteChangeEvent, RouteSegment};
use routesync_core::session::{
    parse_timestamp, plan_arrival, resolve_restore, ArrivalStep, DriverStatusEvidence,
    EventWatermarks, NoSessionReason, OffRouteConfig, OffRouteDecision, OffRouteDetector,
    RestoreResolution, RouteSession, SessionError, SessionState, SnapshotEvidence,
};
use tokio::sync::Mutex;
use uom::si::f64::Length as Distance;
use uom::si::length::meter;

use super::outcome::{
    AdvanceOutcome, AnomalyOutcome, BootstrapOutcome, DiscardReason, EventOutcome,
    PositionOutcome, RestoreOutcome,
};
use super::{SessionNotice, SessionStatus};
use crate::app::RouteSyncError;
use crate::client::dto::{lon_lat_points, AnomalyReport, RecalculationRequest, ON_ROUTE_STATUS};
use crate::client::{load_route_segments, ClientError, RouteBackend};
use crate::store::session_keys::{
    clear_persisted, last_event_timestamp_key, load_persisted, ACTIVE_ROUTE_ID_KEY,
    CURRENT_SEGMENT_INDEX_KEY, IS_ON_ROUTE_KEY, LAST_EVENT_TIMESTAMP_PREFIX, VEHICLE_ID_KEY,
};
use crate::store::SessionStore;
use crate::stream::{
    decode_route_event, publish_position, EventSubscriber, IncomingMessage, PubSubChannel,
    SubscriptionState,
};

/// everything the manager mutates. guarded by a single lock so that the
/// handling of one input never interleaves with another.
struct ManagerState<S> {
    session: RouteSession,
    store: S,
    detector: OffRouteDetector,
    subscriber: EventSubscriber,
    last_position: Option<Point<f64>>,
}

impl<S: SessionStore> ManagerState<S> {
    fn persist(&mut self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            log::warn!("failure writing '{key}' to session store: {e}");
        }
    }

    fn persist_index(&mut self) {
        let index = self.session.current_segment_index().to_string();
        self.persist(CURRENT_SEGMENT_INDEX_KEY, &index);
    }

    /// ends the session in memory and on disk, including the watermark of
    /// `vehicle_id` (or of the session's vehicle).
    fn clear_session(&mut self, vehicle_id: Option<&str>) {
        let vehicle_id = vehicle_id
            .map(String::from)
            .or_else(|| self.session.vehicle_id().map(String::from));
        if let Err(e) = clear_persisted(&mut self.store, vehicle_id.as_deref()) {
            log::warn!("failure clearing session store: {e}");
        }
        if let Some(vid) = &vehicle_id {
            self.session.watermarks.remove(vid);
        }
        self.session.clear();
        self.detector.reset();
    }

    fn stored_active_route(&self) -> Option<String> {
        match self.store.get(ACTIVE_ROUTE_ID_KEY) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                log::warn!("failure reading '{ACTIVE_ROUTE_ID_KEY}' from session store: {e}");
                None
            }
        }
    }

    fn stored_segment_index(&self) -> Option<usize> {
        self.store
            .get(CURRENT_SEGMENT_INDEX_KEY)
            .ok()
            .flatten()
            .and_then(|s| s.parse().ok())
    }
}

/// the single owner of the driver's route session.
///
/// reconciles the persisted session, the route service and the route event
/// stream, watches live positions for off-route recalculation and applies
/// arrival confirmations.
pub struct RouteSessionManager<B, S, P> {
    backend: Arc<B>,
    channel: Arc<P>,
    user_id: String,
    arrival_radius: Distance,
    state: Mutex<ManagerState<S>>,
}

impl<B, S, P> RouteSessionManager<B, S, P>
where
    B: RouteBackend,
    S: SessionStore,
    P: PubSubChannel,
{
    pub fn new(
        backend: Arc<B>,
        store: S,
        channel: Arc<P>,
        user_id: &str,
        off_route: &OffRouteConfig,
        arrival_radius_m: f64,
    ) -> Self {
        RouteSessionManager {
            backend,
            channel,
            user_id: user_id.to_string(),
            arrival_radius: Distance::new::<meter>(arrival_radius_m),
            state: Mutex::new(ManagerState {
                session: RouteSession::default(),
                store,
                detector: OffRouteDetector::from(off_route),
                subscriber: EventSubscriber::default(),
                last_position: None,
            }),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// rebuilds the session from the device store after validating it with
    /// the route service and the driver status.
    pub async fn restore(&self) -> RestoreOutcome {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let persisted = load_persisted(&state.store);
        seed_watermarks(&state.store, &mut state.session.watermarks);

        let (snapshot, status) = match &persisted.active_route_id {
            None => (None, DriverStatusEvidence::Unavailable),
            Some(route_id) => {
                let snapshot = match self.backend.route_metadata(route_id).await {
                    Ok(meta) => SnapshotEvidence::Fetched(meta.ownership()),
                    Err(e) => {
                        log::warn!("could not validate persisted route {route_id}: {e}");
                        SnapshotEvidence::Unavailable
                    }
                };
                (Some(snapshot), self.driver_status_evidence().await)
            }
        };

        match resolve_restore(&persisted, snapshot.as_ref(), status, &self.user_id) {
            RestoreResolution::NoSession {
                reason,
                clear_persisted,
            } => {
                if clear_persisted {
                    log::info!(
                        "dropping persisted route {:?}: {reason:?}",
                        persisted.active_route_id
                    );
                    state.clear_session(persisted.vehicle_id.as_deref());
                } else {
                    state.session.clear();
                }
                RestoreOutcome::NoSession(reason)
            }
            RestoreResolution::Adopt {
                route_id,
                vehicle_id,
                segment_index,
                on_route,
            } => {
                state.session.adopt_route(&route_id);
                state.session.set_vehicle_id(vehicle_id.clone());
                state.session.set_on_route(on_route);
                match self.load_segments(&route_id).await {
                    Ok(segments) => {
                        state.session.replace_segments(segments);
                        state.session.set_current_segment_index(segment_index);
                        state.detector.reset();
                        state.persist(ACTIVE_ROUTE_ID_KEY, &route_id);
                        state.persist_index();
                        if let Some(vid) = &vehicle_id {
                            state.persist(VEHICLE_ID_KEY, vid);
                        }
                        state.persist(IS_ON_ROUTE_KEY, &on_route.to_string());
                        let segment_index = state.session.current_segment_index();
                        log::info!(
                            "restored route {route_id} at segment {segment_index}, on route: {on_route}"
                        );
                        RestoreOutcome::Restored {
                            route_id,
                            segment_index,
                            on_route,
                        }
                    }
                    Err(e) => {
                        log::warn!("route {route_id} could not be loaded, dropping session: {e}");
                        state.clear_session(vehicle_id.as_deref());
                        RestoreOutcome::NoSession(NoSessionReason::PathUnavailable)
                    }
                }
            }
        }
    }

    /// asks the route service for the user's active route when nothing could
    /// be restored.
    pub async fn bootstrap(&self) -> BootstrapOutcome {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let active = match self.backend.active_route(&self.user_id).await {
            Ok(Some(active)) => active,
            Ok(None) => {
                log::info!("no active route for user {}", self.user_id);
                state.session.set_on_route(false);
                return BootstrapOutcome::NoActiveRoute;
            }
            Err(e) => {
                log::warn!("active route lookup failed: {e}");
                return BootstrapOutcome::Unavailable;
            }
        };

        state.session.adopt_route(&active.id);
        state.session.set_vehicle_id(active.vehicle_id.clone());
        state.session.set_on_route(true);
        if let Some(vid) = &active.vehicle_id {
            state.session.watermarks.remove(vid);
            if let Err(e) = state.store.remove(&last_event_timestamp_key(vid)) {
                log::warn!("failure resetting event watermark of vehicle {vid}: {e}");
            }
        }
        state.persist(ACTIVE_ROUTE_ID_KEY, &active.id);
        state.persist(
            CURRENT_SEGMENT_INDEX_KEY,
            &active.current_segment_index.unwrap_or(0).to_string(),
        );
        if let Some(vid) = &active.vehicle_id {
            state.persist(VEHICLE_ID_KEY, vid);
        }
        state.persist(IS_ON_ROUTE_KEY, "true");

        match self.load_segments(&active.id).await {
            Ok(segments) => {
                state.session.replace_segments(segments);
                state
                    .session
                    .set_current_segment_index(active.current_segment_index.unwrap_or(0));
                state.persist_index();
                state.detector.reset();
                log::info!("resumed active route {} from the route service", active.id);
                BootstrapOutcome::Adopted {
                    route_id: active.id,
                    segment_index: state.session.current_segment_index(),
                }
            }
            Err(e) => {
                log::warn!("active route {} could not be loaded: {e}", active.id);
                state.clear_session(active.vehicle_id.as_deref());
                BootstrapOutcome::Unavailable
            }
        }
    }

    /// (re)subscribes to the route event topic matching what we know about
    /// the vehicle.
    pub async fn subscribe(&self) -> Result<(), RouteSyncError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let vehicle_id = state.session.vehicle_id().map(String::from);
        state
            .subscriber
            .subscribe(self.channel.as_ref(), vehicle_id.as_deref())
            .await?;
        Ok(())
    }

    /// the broker dropped the connection and with it our subscription.
    pub async fn connection_lost(&self) {
        self.state.lock().await.subscriber.mark_disconnected();
    }

    pub async fn subscription(&self) -> SubscriptionState {
        self.state.lock().await.subscriber.state().clone()
    }

    /// handles one message taken off the event stream. while subscribed to
    /// the wildcard, the route's owner decides whether the message is ours
    /// and, if so, which vehicle topic to switch to.
    pub async fn handle_message(
        &self,
        message: &IncomingMessage,
    ) -> Result<EventOutcome, RouteSyncError> {
        let event = match decode_route_event(&message.topic, &message.payload, message.retained) {
            Ok(event) => event,
            Err(e) => {
                log::debug!("discarding message on {}: {e}", message.topic);
                return Ok(EventOutcome::Discarded(DiscardReason::Malformed));
            }
        };
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        match state.subscriber.state().clone() {
            SubscriptionState::Wildcard => {
                let meta = match self.backend.route_metadata(&event.route_id).await {
                    Ok(meta) => meta,
                    Err(e) => {
                        log::debug!("owner of route {} unresolved: {e}", event.route_id);
                        return Ok(EventOutcome::Discarded(DiscardReason::OwnerUnresolved));
                    }
                };
                if meta.associated_user_id().as_deref() != Some(self.user_id.as_str()) {
                    log::debug!("route {} belongs to another user", event.route_id);
                    return Ok(EventOutcome::Discarded(DiscardReason::ForeignRoute));
                }
                let vehicle_id = meta
                    .vehicle_id()
                    .unwrap_or_else(|| event.topic_vehicle_id.clone());
                state.session.set_vehicle_id(Some(vehicle_id.clone()));
                state.persist(VEHICLE_ID_KEY, &vehicle_id);
                state
                    .subscriber
                    .switch_to_specific(self.channel.as_ref(), &vehicle_id)
                    .await?;
            }
            SubscriptionState::Specific { vehicle_id } if vehicle_id != event.topic_vehicle_id => {
                log::debug!(
                    "discarding event of vehicle {} while following {vehicle_id}",
                    event.topic_vehicle_id
                );
                return Ok(EventOutcome::Discarded(DiscardReason::ForeignVehicle));
            }
            _ => {}
        }
        self.apply_locked(state, event).await
    }

    /// applies a route-change event to the session.
    pub async fn apply_event(&self, event: RouteChangeEvent) -> Result<EventOutcome, RouteSyncError> {
        let mut guard = self.state.lock().await;
        self.apply_locked(&mut guard, event).await
    }

    async fn apply_locked(
        &self,
        state: &mut ManagerState<S>,
        event: RouteChangeEvent,
    ) -> Result<EventOutcome, RouteSyncError> {
        if event.retained
            && state.stored_active_route().is_none()
            && !self.driver_status_evidence().await.is_on_route()
        {
            log::debug!(
                "ignoring retained event for route {}, driver is not on route",
                event.route_id
            );
            return Ok(EventOutcome::Discarded(DiscardReason::RetainedWhileIdle));
        }

        let vehicle_id = event.topic_vehicle_id.clone();
        if !state.session.watermarks.is_newer(&vehicle_id, &event.timestamp) {
            log::debug!(
                "ignoring event for route {} at {}, already applied a newer one",
                event.route_id,
                event.timestamp
            );
            return Ok(EventOutcome::Discarded(DiscardReason::Stale));
        }
        state
            .store
            .set(&last_event_timestamp_key(&vehicle_id), &event.timestamp.to_rfc3339())?;
        state.session.watermarks.try_advance(&vehicle_id, event.timestamp);

        if state.session.active_route_id() == Some(event.route_id.as_str()) {
            let segments = self.load_segments(&event.route_id).await?;
            state.session.replace_segments(segments);
            state.persist_index();
            state.detector.reset();
            log::info!("route {} updated ({})", event.route_id, event.kind);
            return Ok(EventOutcome::Applied(SessionNotice::RouteUpdated {
                route_id: event.route_id,
                kind: event.kind,
            }));
        }

        state.persist(ACTIVE_ROUTE_ID_KEY, &event.route_id);
        state.persist(IS_ON_ROUTE_KEY, "true");
        state.session.adopt_route(&event.route_id);
        state.session.set_on_route(true);
        if state.session.vehicle_id().is_none() {
            let meta = self.backend.route_metadata(&event.route_id).await?;
            let vid = meta.vehicle_id().unwrap_or(vehicle_id);
            state.persist(VEHICLE_ID_KEY, &vid);
            state.session.set_vehicle_id(Some(vid));
        }
        let segments = self.load_segments(&event.route_id).await?;
        state.session.replace_segments(segments);
        match state.stored_segment_index() {
            Some(index) => {
                state.session.set_current_segment_index(index);
                if state.session.current_segment_index() != index {
                    state.persist_index();
                }
            }
            None => {
                state.session.set_current_segment_index(0);
                state.persist_index();
            }
        }
        state.detector.reset();
        log::info!(
            "accepted route {} ({}) at segment {}",
            event.route_id,
            event.kind,
            state.session.current_segment_index()
        );
        Ok(EventOutcome::Applied(SessionNotice::NewRoute {
            route_id: event.route_id,
            kind: event.kind,
        }))
    }

    /// feeds one live position sample. an off-route sample asks the route
    /// service for a new path of the current segment; the lock is released
    /// while the request is pending.
    pub async fn on_position(&self, position: Point<f64>) -> PositionOutcome {
        let (generation, index, segment_id, request) = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            state.last_position = Some(position);
            if state.session.state() != SessionState::Active {
                return PositionOutcome::Idle;
            }
            let (route_id, segment) =
                match (state.session.active_route_id(), state.session.current_segment()) {
                    (Some(r), Some(s)) => (r.to_string(), s.clone()),
                    _ => return PositionOutcome::Idle,
                };
            let decision = state
                .detector
                .evaluate(&position, &segment.geometry, Instant::now());
            let distance = match decision {
                OffRouteDecision::Trigger { distance } => distance,
                other => return PositionOutcome::Tracked(other),
            };
            log::warn!(
                "{:.0} m off segment {} of route {route_id}, requesting a new path",
                distance.get::<meter>(),
                segment.id
            );
            (
                state.session.generation(),
                state.session.current_segment_index(),
                segment.id.clone(),
                RecalculationRequest::driver(&position, &route_id, &segment.id),
            )
        };

        let response = self.backend.recalculate_route(&request).await;

        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        if state.session.generation() != generation {
            log::debug!("dropping recalculation of segment {segment_id}, session changed");
            return PositionOutcome::RecalculationDiscarded;
        }
        let response = match response {
            Ok(response) => response,
            Err(e) => {
                log::warn!("recalculation of segment {segment_id} failed: {e}");
                return PositionOutcome::RecalculationFailed;
            }
        };
        let updated = match response.accepted_segment() {
            Some(updated) => updated,
            None => {
                let message = response
                    .message
                    .clone()
                    .unwrap_or_else(|| String::from("recalculation rejected"));
                log::warn!("recalculation of segment {segment_id} rejected: {message}");
                return PositionOutcome::RecalculationRejected { message };
            }
        };
        let (distance_m, time_s) = match state.session.segments().get(index) {
            Some(s) => (
                updated.distance_m.unwrap_or(s.distance_m),
                updated.time_s.unwrap_or(s.time_s),
            ),
            None => return PositionOutcome::RecalculationDiscarded,
        };
        match state.session.replace_segment_path(
            index,
            &segment_id,
            lon_lat_points(&updated.geometry),
            distance_m,
            time_s,
        ) {
            Ok(true) => {
                log::info!("segment {segment_id} re-routed");
                PositionOutcome::Recalculated { segment_id }
            }
            Ok(false) => PositionOutcome::RecalculationDiscarded,
            Err(e) => {
                log::warn!("unusable recalculated path for segment {segment_id}: {e}");
                PositionOutcome::RecalculationRejected {
                    message: e.to_string(),
                }
            }
        }
    }

    /// confirms arrival at the current segment's destination.
    pub async fn advance(&self) -> Result<AdvanceOutcome, RouteSyncError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let route_id = match (state.session.state(), state.session.active_route_id()) {
            (SessionState::Active, Some(route_id)) => route_id.to_string(),
            _ => return Err(SessionError::NoActiveSession.into()),
        };
        let plan = plan_arrival(
            state.session.segments(),
            state.session.current_segment_index(),
        )?;
        log::info!(
            "arrived at the {:?} stop of segment {}",
            plan.role,
            plan.segment_id
        );
        for order_id in plan.pickups.iter() {
            if let Err(e) = self.backend.mark_picked_up(order_id).await {
                log::warn!("failure marking order {order_id} picked up: {e}");
            }
        }
        for order_id in plan.deliveries.iter() {
            if let Err(e) = self.backend.mark_delivered(order_id).await {
                log::warn!("failure marking order {order_id} delivered: {e}");
            }
        }

        match plan.step {
            ArrivalStep::Advance { next_index } => {
                state.session.set_current_segment_index(next_index);
                state.detector.reset();
                if let Err(e) = self.backend.update_progress(&route_id, next_index).await {
                    log::warn!("failure reporting progress of route {route_id}: {e}");
                }
                state.persist_index();
                Ok(AdvanceOutcome::Advanced {
                    segment_index: next_index,
                    destination: state.session.current_segment().map(|s| s.to_name.clone()),
                })
            }
            ArrivalStep::Complete => {
                let response = self.backend.complete_route(&route_id).await?;
                if response.is_ok() {
                    state.clear_session(None);
                    log::info!("route {route_id} completed");
                    Ok(AdvanceOutcome::Completed { route_id })
                } else {
                    let message = response.message_or("route completion failed");
                    log::warn!("completion of route {route_id} refused: {message}");
                    Ok(AdvanceOutcome::CompletionRejected { message })
                }
            }
        }
    }

    /// reports an anomaly at `position`, or at the last known position. an
    /// accepted report ends the session.
    pub async fn report_anomaly(
        &self,
        position: Option<Point<f64>>,
    ) -> Result<AnomalyOutcome, RouteSyncError> {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        let vehicle_id = state
            .session
            .vehicle_id()
            .map(String::from)
            .ok_or(SessionError::MissingVehicle)?;
        let position = position
            .or(state.last_position)
            .ok_or(SessionError::MissingPosition)?;
        let report = AnomalyReport {
            user_id: self.user_id.clone(),
            vehicle_id: vehicle_id.clone(),
            active_route_id: state.session.active_route_id().map(String::from),
            anomaly_lat: position.y(),
            anomaly_lon: position.x(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        let response = self.backend.report_anomaly(&report).await?;
        if !response.is_ok() {
            let message = response.message_or("anomaly report failed");
            log::warn!("anomaly report refused: {message}");
            return Ok(AnomalyOutcome::Rejected { message });
        }
        state.clear_session(Some(&vehicle_id));
        state.persist(IS_ON_ROUTE_KEY, "false");
        log::info!("anomaly reported for vehicle {vehicle_id}, session closed");
        Ok(AnomalyOutcome::Reported)
    }

    /// publishes the last known position when a session is active, the
    /// vehicle is known and the channel is up. returns true when published.
    pub async fn heartbeat(&self) -> Result<bool, RouteSyncError> {
        let guard = self.state.lock().await;
        let (vehicle_id, position) = match (
            guard.session.state(),
            guard.session.vehicle_id(),
            guard.last_position,
        ) {
            (SessionState::Active, Some(vid), Some(position)) => (vid.to_string(), position),
            _ => return Ok(false),
        };
        if !self.channel.is_connected() {
            return Ok(false);
        }
        publish_position(self.channel.as_ref(), &vehicle_id, &position, Utc::now()).await?;
        Ok(true)
    }

    /// whether `position` is within the arrival radius of the current
    /// destination.
    pub async fn is_near_destination(&self, position: &Point<f64>) -> bool {
        let guard = self.state.lock().await;
        guard
            .session
            .distance_to_destination(position)
            .map(|d| d <= self.arrival_radius)
            .unwrap_or(false)
    }

    pub async fn status(&self) -> SessionStatus {
        let guard = self.state.lock().await;
        let session = &guard.session;
        let current = session.current_segment();
        let distance = guard
            .last_position
            .as_ref()
            .and_then(|p| session.distance_to_destination(p));
        SessionStatus {
            state: session.state(),
            route_id: session.active_route_id().map(String::from),
            vehicle_id: session.vehicle_id().map(String::from),
            segment_index: session.current_segment_index(),
            segment_count: session.segments().len(),
            on_route: session.on_route(),
            destination: current.map(|s| s.to_name.clone()),
            segment_time_s: current.map(|s| s.time_s),
            distance_to_destination_m: distance.map(|d| d.get::<meter>()),
            near_destination: distance.map(|d| d <= self.arrival_radius).unwrap_or(false),
            subscription: guard.subscriber.state().clone(),
        }
    }

    /// leaves the event topic and closes the channel. results of requests
    /// still in flight are dropped.
    pub async fn teardown(&self) {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;
        state.session.invalidate_pending();
        if let Err(e) = state.subscriber.teardown(self.channel.as_ref()).await {
            log::warn!("failure unsubscribing: {e}");
        }
        if let Err(e) = self.channel.disconnect().await {
            log::warn!("failure disconnecting: {e}");
        }
    }

    async fn driver_status_evidence(&self) -> DriverStatusEvidence {
        match self.backend.driver_status(&self.user_id).await {
            Ok(Some(status)) if status == ON_ROUTE_STATUS => DriverStatusEvidence::OnRoute,
            Ok(_) => DriverStatusEvidence::NotOnRoute,
            Err(e) => {
                log::debug!("driver status unavailable: {e}");
                DriverStatusEvidence::Unavailable
            }
        }
    }

    /// loads a route's segments. an empty route counts as a failure.
    async fn load_segments(
        &self,
        route_id: &str,
    ) -> Result<Vec<RouteSegment>, ClientError> {
        let segments = load_route_segments(self.backend.as_ref(), route_id).await?;
        if segments.is_empty() {
            return Err(ClientError::EmptyRoute {
                route_id: route_id.to_string(),
            });
        }
        Ok(segments)
    }
}

/// loads the persisted per-vehicle watermarks into memory.
fn seed_watermarks<S: SessionStore + ?Sized>(store: &S, watermarks: &mut EventWatermarks) {
    let entries = match store.entries() {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("failure reading event watermarks: {e}");
            return;
        }
    };
    for (key, value) in entries {
        let vehicle_id = match key.strip_prefix(LAST_EVENT_TIMESTAMP_PREFIX) {
            Some(vid) if !vid.is_empty() => vid,
            _ => continue,
        };
        match parse_timestamp(&value) {
            Ok(ts) => watermarks.seed(vehicle_id, ts),
            Err(e) => log::debug!("ignoring stored watermark of vehicle {vehicle_id}: {e}"),
        }
    }
}

#[cfg(test)]
impl<B, S, P> RouteSessionManager<B, S, P>
where
    S: SessionStore,
{
    pub(crate) async fn store_entries(&self) -> Vec<(String, String)> {
        self.state
            .lock()
            .await
            .store
            .entries()
            .expect("test invariant failed: store readable")
    }
}
