pub mod activities;
pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod groups;
pub mod marketplace;
pub mod president;
pub mod responses;
pub mod router;
pub mod state;
pub mod users;

use std::net::SocketAddr;

use axum::{middleware::from_fn_with_state, Router};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio::{net::TcpListener, signal};

pub use config::Config;
pub use database::Database;
pub use errors::AppError;
pub use responses::{AppJson, AppResult, ErrorMessage};
pub use router::get_router;
pub use state::{App, AppState};

/// Every application route sits behind the bearer-token middleware; only
/// `/metrics` and the 404 fallback live outside it.
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(groups::routes())
        .merge(president::routes())
        .merge(activities::routes())
        .merge(users::routes())
        .merge(marketplace::routes())
        .layer(from_fn_with_state(state, auth::jwt_middleware))
}

pub fn run(config_path: &str) {
    let config = Config::from_file(config_path);
    let _sentry_guard = config.init_tracing();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(config.threads)
        .max_blocking_threads(config.threads)
        .build()
        .unwrap()
        .block_on(async {
            let metrics = PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install the metrics recorder");

            let state = AppState::new(config.clone(), Some(metrics));
            state.primary_database.run_migrations().await;

            let router = get_router(state.clone(), api_routes(state.clone()));
            let addr = TcpListener::bind((config.ip, config.port)).await.unwrap();
            axum::serve(
                addr,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(shutdown_signal())
            .await
        })
        .unwrap();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
