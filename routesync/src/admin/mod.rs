mod live_monitor;

pub use live_monitor::{LiveMonitor, MonitorReport};
