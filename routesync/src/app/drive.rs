use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use geo::Point;
use routesync_core::session::OffRouteDecision;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, MissedTickBehavior};
use uom::si::length::meter;

use super::{Credentials, RouteSyncError};
use crate::client::HttpBackend;
use crate::config::RouteSyncConfiguration;
use crate::session::{
    AdvanceOutcome, AnomalyOutcome, BootstrapOutcome, EventOutcome, PositionOutcome,
    RestoreOutcome, RouteSessionManager,
};
use crate::store::SessionStore;
use crate::stream::{ChannelEvent, MqttChannel};

const RECONNECT_DELAY: Duration = Duration::from_secs(2);

type DriverSession<S> = RouteSessionManager<HttpBackend, S, MqttChannel>;

/// one line typed by the driver.
#[derive(Clone, Debug, PartialEq)]
pub enum DriverCommand {
    /// `pos <lat> <lon>`
    Position(Point<f64>),
    Arrive,
    Anomaly,
    Status,
    Quit,
}

impl FromStr for DriverCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let command = words
            .next()
            .map(str::to_lowercase)
            .ok_or_else(|| String::from("empty command"))?;
        let parsed = match command.as_str() {
            "pos" => {
                let lat = coordinate(words.next(), "lat", 90.0)?;
                let lon = coordinate(words.next(), "lon", 180.0)?;
                DriverCommand::Position(Point::new(lon, lat))
            }
            "arrive" => DriverCommand::Arrive,
            "anomaly" => DriverCommand::Anomaly,
            "status" => DriverCommand::Status,
            "quit" | "exit" => DriverCommand::Quit,
            other => return Err(format!("unknown command '{other}'")),
        };
        match words.next() {
            Some(extra) => Err(format!("unexpected argument '{extra}'")),
            None => Ok(parsed),
        }
    }
}

fn coordinate(word: Option<&str>, name: &str, limit: f64) -> Result<f64, String> {
    let word = word.ok_or_else(|| format!("missing {name}"))?;
    let value = word
        .parse::<f64>()
        .map_err(|_| format!("invalid {name} '{word}'"))?;
    if !value.is_finite() || value.abs() > limit {
        return Err(format!("{name} out of range: {value}"));
    }
    Ok(value)
}

/// runs the driver client until `quit` or ctrl-c.
///
/// the session is restored (or adopted from the route service) before the
/// event stream is subscribed. every broker (re)connect subscribes again.
pub async fn run_driver<S>(
    conf: &RouteSyncConfiguration,
    credentials: &Credentials,
    store: S,
) -> Result<(), RouteSyncError>
where
    S: SessionStore + 'static,
{
    let backend = HttpBackend::new(
        &conf.api_base_url,
        Some(credentials.token.clone()),
        conf.request_timeout(),
    )?;
    let (channel, mut events) = MqttChannel::connect(&conf.mqtt);
    let manager = Arc::new(RouteSessionManager::new(
        Arc::new(backend),
        store,
        Arc::new(channel),
        &credentials.user_id,
        &conf.driver_off_route(),
        conf.arrival_radius_m,
    ));

    start_session(&manager).await;
    println!("{}", manager.status().await);

    let mut heartbeat = tokio::time::interval(conf.heartbeat_interval());
    heartbeat.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut reconnect_at: Option<Instant> = None;

    let result = loop {
        tokio::select! {
            event = events.next(), if reconnect_at.is_none() => match event {
                Ok(ChannelEvent::Connected) => {
                    if let Err(e) = manager.subscribe().await {
                        log::warn!("failure subscribing to route events: {e}");
                    }
                }
                Ok(ChannelEvent::Message(message)) => {
                    match manager.handle_message(&message).await {
                        Ok(EventOutcome::Applied(notice)) => println!("{notice}"),
                        Ok(EventOutcome::Discarded(reason)) => {
                            log::debug!("event on {} discarded: {reason:?}", message.topic)
                        }
                        Err(e) => log::warn!("event on {} not applied: {e}", message.topic),
                    }
                }
                Ok(ChannelEvent::Other) => {}
                Err(e) => {
                    log::warn!("mqtt connection lost: {e}");
                    manager.connection_lost().await;
                    reconnect_at = Some(Instant::now() + RECONNECT_DELAY);
                }
            },
            _ = reconnect_pause(reconnect_at), if reconnect_at.is_some() => {
                reconnect_at = None;
            },
            _ = heartbeat.tick() => {
                if let Err(e) = manager.heartbeat().await {
                    log::warn!("failure publishing position: {e}");
                }
            },
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => match line.parse::<DriverCommand>() {
                    Ok(DriverCommand::Quit) => break Ok(()),
                    Ok(command) => run_command(&manager, command).await,
                    Err(message) => eprintln!("{message}"),
                },
                Ok(None) => {
                    log::info!("stdin closed, running until ctrl-c");
                    stdin_open = false;
                }
                Err(e) => break Err(RouteSyncError::from(e)),
            },
            _ = tokio::signal::ctrl_c() => break Ok(()),
        }
    };

    manager.teardown().await;
    log::info!("driver client stopped");
    result
}

/// resolves at `deadline`, never when there is none.
async fn reconnect_pause(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn start_session<S: SessionStore + 'static>(manager: &DriverSession<S>) {
    match manager.restore().await {
        RestoreOutcome::Restored {
            route_id,
            segment_index,
            on_route,
        } => log::info!(
            "restored route {route_id} at segment {segment_index} (on route: {on_route})"
        ),
        RestoreOutcome::NoSession(reason) => {
            log::info!("no session restored ({reason:?}), asking for the active route");
            match manager.bootstrap().await {
                BootstrapOutcome::Adopted {
                    route_id,
                    segment_index,
                } => log::info!("adopted active route {route_id} at segment {segment_index}"),
                BootstrapOutcome::NoActiveRoute => {
                    log::info!("no active route, waiting for an assignment")
                }
                BootstrapOutcome::Unavailable => {
                    log::warn!("active route unavailable, waiting for route events")
                }
            }
        }
    }
}

async fn run_command<S: SessionStore + 'static>(
    manager: &Arc<DriverSession<S>>,
    command: DriverCommand,
) {
    match command {
        DriverCommand::Position(position) => {
            // a recalculation can take a while, keep reading input meanwhile
            let manager = Arc::clone(manager);
            tokio::spawn(async move {
                let outcome = manager.on_position(position).await;
                if let Some(line) = describe_position(&outcome) {
                    println!("{line}");
                }
                if manager.is_near_destination(&position).await {
                    println!("destination within reach, send 'arrive' to confirm");
                }
            });
        }
        DriverCommand::Arrive => match manager.advance().await {
            Ok(AdvanceOutcome::Advanced {
                segment_index,
                destination,
            }) => println!(
                "now on segment {segment_index}, heading to {}",
                destination.as_deref().unwrap_or("?")
            ),
            Ok(AdvanceOutcome::Completed { route_id }) => println!("route {route_id} completed"),
            Ok(AdvanceOutcome::CompletionRejected { message }) => {
                println!("completion refused: {message}")
            }
            Err(e) => eprintln!("arrival not confirmed: {e}"),
        },
        DriverCommand::Anomaly => match manager.report_anomaly(None).await {
            Ok(AnomalyOutcome::Reported) => println!("anomaly reported, route closed"),
            Ok(AnomalyOutcome::Rejected { message }) => println!("anomaly refused: {message}"),
            Err(e) => eprintln!("anomaly not reported: {e}"),
        },
        DriverCommand::Status => println!("{}", manager.status().await),
        DriverCommand::Quit => {}
    }
}

/// a line for the driver, or None when the sample needs no attention.
pub fn describe_position(outcome: &PositionOutcome) -> Option<String> {
    match outcome {
        PositionOutcome::Idle => Some(String::from("no active route")),
        PositionOutcome::Tracked(OffRouteDecision::CoolingDown {
            distance,
            remaining,
        }) => Some(format!(
            "off route by {:.0} m, next recalculation in {}",
            distance.get::<meter>(),
            humantime::format_duration(Duration::from_secs(remaining.as_secs()))
        )),
        PositionOutcome::Tracked(OffRouteDecision::Trigger { distance }) => Some(format!(
            "off route by {:.0} m",
            distance.get::<meter>()
        )),
        PositionOutcome::Tracked(_) => None,
        PositionOutcome::Recalculated { segment_id } => {
            Some(format!("segment {segment_id} recalculated"))
        }
        PositionOutcome::RecalculationRejected { message } => {
            Some(format!("recalculation refused: {message}"))
        }
        PositionOutcome::RecalculationFailed => {
            Some(String::from("recalculation failed, keeping the planned path"))
        }
        PositionOutcome::RecalculationDiscarded => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uom::si::f64::Length;

    #[test]
    fn test_parse_position() {
        let command = "pos 40.35 18.17".parse::<DriverCommand>();
        assert_eq!(command, Ok(DriverCommand::Position(Point::new(18.17, 40.35))));
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!("ARRIVE".parse::<DriverCommand>(), Ok(DriverCommand::Arrive));
        assert_eq!("  anomaly ".parse::<DriverCommand>(), Ok(DriverCommand::Anomaly));
        assert_eq!("status".parse::<DriverCommand>(), Ok(DriverCommand::Status));
        assert_eq!("exit".parse::<DriverCommand>(), Ok(DriverCommand::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<DriverCommand>().is_err());
        assert!("pos 40.0".parse::<DriverCommand>().is_err());
        assert!("pos north 18.0".parse::<DriverCommand>().is_err());
        assert!("pos 95.0 18.0".parse::<DriverCommand>().is_err());
        assert!("arrive now".parse::<DriverCommand>().is_err());
        assert!("fly".parse::<DriverCommand>().is_err());
    }

    #[test]
    fn test_describe_position() {
        let on_path = PositionOutcome::Tracked(OffRouteDecision::OnPath {
            distance: Length::new::<meter>(3.0),
        });
        assert_eq!(describe_position(&on_path), None);
        let cooling = PositionOutcome::Tracked(OffRouteDecision::CoolingDown {
            distance: Length::new::<meter>(74.6),
            remaining: Duration::from_millis(4200),
        });
        assert_eq!(
            describe_position(&cooling).as_deref(),
            Some("off route by 75 m, next recalculation in 4s")
        );
        assert_eq!(
            describe_position(&PositionOutcome::Recalculated {
                segment_id: String::from("s2")
            })
            .as_deref(),
            Some("segment s2 recalculated")
        );
    }

    #[tokio::test]
    async fn test_reconnect_pause_waits_for_deadline() {
        let deadline = Instant::now() + Duration::from_millis(20);
        let waited = tokio::time::timeout(Duration::from_secs(2), reconnect_pause(Some(deadline)));
        assert!(waited.await.is_ok());
        assert!(Instant::now() >= deadline);
    }

    #[tokio::test]
    async fn test_reconnect_pause_without_deadline_stays_pending() {
        let waited = tokio::time::timeout(Duration::from_millis(30), reconnect_pause(None));
        assert!(waited.await.is_err());
    }
}
