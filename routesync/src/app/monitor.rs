use std::sync::Arc;

use tokio::time::MissedTickBehavior;

use super::RouteSyncError;
use crate::admin::LiveMonitor;
use crate::client::HttpBackend;
use crate::config::RouteSyncConfiguration;

/// polls the live fleet until ctrl-c and prints what happened to `vehicle_id`.
pub async fn run_monitor(
    conf: &RouteSyncConfiguration,
    token: String,
    vehicle_id: &str,
) -> Result<(), RouteSyncError> {
    let backend = HttpBackend::new(&conf.api_base_url, Some(token), conf.request_timeout())?;
    let mut monitor = LiveMonitor::new(Arc::new(backend), vehicle_id, &conf.admin_off_route());
    let mut ticker = tokio::time::interval(conf.admin_poll_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    log::info!(
        "monitoring vehicle {} every {}s",
        monitor.vehicle_id(),
        conf.admin_poll_interval().as_secs()
    );
    loop {
        tokio::select! {
            _ = ticker.tick() => match monitor.poll().await {
                Ok(report) => println!("{}: {report}", monitor.vehicle_id()),
                Err(e) => log::warn!("live poll failed: {e}"),
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    Ok(())
}
