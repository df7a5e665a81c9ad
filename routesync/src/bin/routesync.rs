use clap::Parser;
use routesync::app::RouteSyncApp;

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = RouteSyncApp::parse();
    if let Err(e) = args.run().await {
        log::error!("{e}");
        eprintln!("routesync: {e}");
        std::process::exit(1);
    }
}
