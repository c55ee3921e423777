use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use subway_server::path::CacheConfig;
use subway_server::store::{LineStore, StationRegistry, load_seed};
use subway_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info")
        }))
        .init();

    let stations = StationRegistry::new();
    let lines = LineStore::new();

    // Optionally preload the network from a JSON seed file
    if let Ok(path) = std::env::var("SUBWAY_SEED") {
        match load_seed(&path, &stations, &lines).await {
            Ok(summary) => println!(
                "Seeded {} stations, {} lines, {} sections from {path}",
                summary.stations, summary.lines, summary.sections
            ),
            Err(e) => eprintln!("Warning: failed to load seed file {path}: {e}"),
        }
    }

    // Build app state
    let state = AppState::new(stations, lines, &CacheConfig::default());

    // Create router
    let app = create_router(state);

    // Bind and serve
    let addr: SocketAddr = match std::env::var("SUBWAY_BIND") {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            eprintln!("Warning: invalid SUBWAY_BIND {raw:?}, using 127.0.0.1:3000");
            SocketAddr::from(([127, 0, 0, 1], 3000))
        }),
        Err(_) => SocketAddr::from(([127, 0, 0, 1], 3000)),
    };

    println!("Subway network service listening on http://{addr}");
    println!();
    println!("API Endpoints:");
    println!("  GET    /health              - Health check");
    println!("  POST   /stations            - Register a station");
    println!("  GET    /stations            - List stations");
    println!("  POST   /lines               - Create a line with its first section");
    println!("  GET    /lines               - List lines");
    println!("  POST   /lines/:id/sections  - Attach a section to a line");
    println!("  DELETE /lines/:id/sections  - Remove a station from a line");
    println!("  GET    /paths               - Shortest route between two stations");

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
