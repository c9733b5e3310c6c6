use std::net::SocketAddr;

use dotenvy::dotenv;

use website::config::Config;
use website::state::AppState;
use website::web;

#[tokio::main]
async fn main() {
    // Load .env file
    dotenv().ok();

    // 1. Start logging
    tracing_subscriber::fmt::init();

    // 2. Load configuration and assemble the application
    let config = Config::load();
    println!("Data directory: {}", config.data_dir.display());

    let host = config.host.clone();
    let port = config.port;

    let state = AppState::new(config);
    let app = web::build_router(state);

    // 3. Start the server (with fallback port)
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("Cannot parse host/port");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!(
                "⚠️  Could not bind {}: {}. Trying fallback {}:{}",
                addr,
                e,
                host,
                port + 1
            );
            let fallback: SocketAddr = format!("{}:{}", host, port + 1)
                .parse()
                .expect("Cannot parse fallback address");
            tokio::net::TcpListener::bind(fallback)
                .await
                .expect("Cannot bind fallback port")
        }
    };

    let bound_addr = listener.local_addr().unwrap();
    println!(
        "🚀 Memorial site (build {}) running on http://{}",
        option_env!("MEMORIAL_BUILD_ID").unwrap_or("dev"),
        bound_addr
    );
    println!("📍 Admin overview at http://{}/admin", bound_addr);

    axum::serve(listener, app).await.unwrap();
}
