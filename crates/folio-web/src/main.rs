//! Folio web server
//!
//! Serves the portfolio pages. Configuration comes from `FOLIO_*`
//! environment variables, see [`folio_web::config`].

use std::sync::Arc;

use folio_core::{run_session_sweeper, MemorySessionStore, SessionStore};
use folio_web::{build_router, AppState, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio_web=info,folio_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Folio web server");

    let config = ServerConfig::from_env()?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        template_dir = %config.template_dir.display(),
        static_dir = %config.static_dir.display(),
        "Configuration loaded"
    );

    let sessions: Arc<dyn SessionStore> =
        Arc::new(MemorySessionStore::new(config.session_lifetime));

    let sweeper_store = Arc::clone(&sessions);
    let sweep_interval = config.session_sweep_interval;
    tokio::spawn(async move {
        run_session_sweeper(sweeper_store, sweep_interval).await;
    });
    tracing::info!(
        lifetime_secs = config.session_lifetime.as_secs(),
        sweep_secs = sweep_interval.as_secs(),
        "Session sweeper spawned"
    );

    let state = match AppState::new(&config, sessions) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Failed to load templates: {}", e);
            return Err(e.into());
        }
    };

    let languages = state.resolver.available_languages();
    if languages.is_empty() {
        tracing::warn!(
            "No language bundles found under {}; every page will fail",
            config.data_dir.display()
        );
    } else {
        tracing::info!(
            languages = %languages.iter().map(|l| l.as_str()).collect::<Vec<_>>().join(","),
            "Language bundles available"
        );
    }

    let app = build_router(state, &config.static_dir);

    let addr = config.bind_addr;
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to {}: {}", addr, e);
            if e.kind() == std::io::ErrorKind::AddrInUse {
                tracing::error!(
                    "Port {} is already in use. Set FOLIO_BIND_ADDR to another address",
                    addr.port()
                );
            }
            return Err(format!("Failed to bind to {}: {}", addr, e).into());
        }
    };

    tracing::info!("Server listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        return Err(format!("Server error: {}", e).into());
    }

    Ok(())
}
