//! HTTP surface of the ZoI checker.
//!
//! | route | handler |
//! |---|---|
//! | `POST /v1/zoiUpload` | store the `image` upload and run the detector |
//! | `POST /v1/checkZoI` | look the `image` name up in the CSV dataset |
//! | `GET /result/{file}` | detection result images |

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::post, Router};
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::info;
use zoi_app::Config;
use zoi_types::Result;

pub mod error;
pub mod routes;
pub mod state;

use routes::{check_zoi_handler, zoi_upload_handler};
pub use state::State;

pub fn router(state: Arc<State>) -> Router {
    Router::new()
        .route("/v1/zoiUpload", post(zoi_upload_handler))
        .route("/v1/checkZoI", post(check_zoi_handler))
        .nest_service("/result", ServeDir::new(&state.config.result_dir))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(config: Config) -> Result<()> {
    info!("Initializing state...");
    let state = State::new(config);
    let store = state.gateway.store();
    info!(
        "Uploads go to {} ({} naming), lookups read {}",
        store.dir().display(),
        store.naming(),
        state.gateway.dataset_path().display()
    );

    let address = state.config.bind_address();
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;

    info!("ZoI backend running on http://{address}");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
