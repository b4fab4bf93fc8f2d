use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

use transit_server::ingest;
use transit_server::planner::SearchConfig;
use transit_server::web::{AppState, DataPaths, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let network: PathBuf = std::env::var("TRANSIT_NETWORK_FILE")
        .unwrap_or_else(|_| "data/network.csv".to_string())
        .into();
    let timetable: PathBuf = std::env::var("TRANSIT_TIMETABLE_FILE")
        .unwrap_or_else(|_| "data/timetable.csv".to_string())
        .into();

    // Fail fast: a server without a plan has nothing to answer.
    let plan = ingest::load(&network, &timetable).expect("failed to load network data");
    info!(
        stations = plan.station_count(),
        sections = plan.section_count(),
        "plan ready"
    );

    let state = AppState::new(
        plan,
        SearchConfig::default(),
        DataPaths { network, timetable },
    );
    let app = create_router(state);

    let addr: SocketAddr = std::env::var("TRANSIT_LISTEN_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()
        .expect("bad TRANSIT_LISTEN_ADDR");

    info!(%addr, "transit planner listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind");
    axum::serve(listener, app).await.expect("server error");
}
