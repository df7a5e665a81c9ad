use std::path::Path;

use clap::Subcommand;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::{drive, monitor, RouteSyncApp, RouteSyncError};
use crate::store::session_keys::{load_persisted, session_keys, LAST_EVENT_TIMESTAMP_PREFIX};
use crate::store::{JsonFileStore, MemoryStore, SessionStore};

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum RouteSyncOperation {
    /// follow the driver's active route. reads `pos <lat> <lon>`, `arrive`,
    /// `anomaly`, `status` and `quit` from stdin.
    Drive,
    /// watch a vehicle from the admin side and recalculate its segment when
    /// it leaves the planned path
    Monitor {
        #[arg(long)]
        vehicle_id: String,
    },
    /// print the persisted session
    Status,
    /// remove the persisted session and all event watermarks
    Clear,
}

impl RouteSyncOperation {
    pub async fn run(&self, app: &RouteSyncApp) -> Result<(), RouteSyncError> {
        let conf = app.configuration()?;
        match self {
            RouteSyncOperation::Drive => {
                let credentials = app.credentials()?;
                if app.ephemeral {
                    drive::run_driver(&conf, &credentials, MemoryStore::new()).await
                } else {
                    let store = JsonFileStore::open(Path::new(&conf.store_path));
                    drive::run_driver(&conf, &credentials, store).await
                }
            }
            RouteSyncOperation::Monitor { vehicle_id } => {
                monitor::run_monitor(&conf, app.token()?, vehicle_id).await
            }
            RouteSyncOperation::Status => {
                let store = JsonFileStore::open(Path::new(&conf.store_path));
                for line in describe_store(&store)? {
                    println!("{line}");
                }
                Ok(())
            }
            RouteSyncOperation::Clear => {
                let mut store = JsonFileStore::open(Path::new(&conf.store_path));
                let removed = clear_store(&mut store)?;
                println!("removed {removed} entries from {}", conf.store_path);
                Ok(())
            }
        }
    }
}

/// human readable lines for the persisted session and its watermarks.
pub fn describe_store<S: SessionStore>(store: &S) -> Result<Vec<String>, RouteSyncError> {
    let persisted = load_persisted(store);
    let mut lines = vec![
        format!(
            "active route:  {}",
            persisted.active_route_id.as_deref().unwrap_or("none")
        ),
        format!(
            "segment index: {}",
            persisted
                .current_segment_index
                .map(|i| i.to_string())
                .unwrap_or_else(|| String::from("none"))
        ),
        format!(
            "vehicle:       {}",
            persisted.vehicle_id.as_deref().unwrap_or("none")
        ),
        format!("on route:      {}", persisted.on_route),
    ];
    let watermarks = store
        .entries()?
        .into_iter()
        .filter_map(|(k, v)| {
            k.strip_prefix(LAST_EVENT_TIMESTAMP_PREFIX)
                .map(|vid| format!("{vid} @ {v}"))
        })
        .join(", ");
    if !watermarks.is_empty() {
        lines.push(format!("watermarks:    {watermarks}"));
    }
    Ok(lines)
}

/// removes the session keys and every event watermark. returns how many
/// entries were present.
pub fn clear_store<S: SessionStore>(store: &mut S) -> Result<usize, RouteSyncError> {
    let present = store.entries()?;
    let keys = session_keys(None)
        .into_iter()
        .chain(
            present
                .iter()
                .filter(|(k, _)| k.starts_with(LAST_EVENT_TIMESTAMP_PREFIX))
                .map(|(k, _)| k.clone()),
        )
        .unique()
        .collect_vec();
    let removed = present.iter().filter(|(k, _)| keys.contains(k)).count();
    store.remove_all(&keys)?;
    log::info!("cleared {removed} session entries");
    Ok(removed)
}
