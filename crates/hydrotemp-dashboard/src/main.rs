use std::net::SocketAddr;

use anyhow::{Context, Result};
use hydrotemp_config::AppConfig;
use hydrotemp_load::{load_session, FileSource};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    // Observability
    hydrotemp_obs::init("hydrotemp");

    // Config
    let cfg = AppConfig::load().context("failed to load configuration")?;
    let bind = cfg.bind();

    // Build app and state
    let (app, state) = hydrotemp_dashboard::build_app()?;

    // Load both sources once; a failure is served as a notice, not retried
    let weather = FileSource::new(cfg.weather_path());
    let water_quality = FileSource::new(cfg.water_quality_path());
    match load_session(&weather, &water_quality, &cfg.session_schema()).await {
        Ok(session) => {
            if let Some(path) = cfg.turbidity_export_path() {
                if let Err(e) = hydrotemp_dashboard::export_turbidity(&session, &path) {
                    tracing::warn!(error = ?e, "turbidity export failed");
                }
            }
            hydrotemp_dashboard::set_session(&state, session).await;
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to load data");
            hydrotemp_dashboard::set_load_error(&state, e.user_message()).await;
        }
    }

    // Start HTTP server
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("invalid bind address {bind}"))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, "HTTP server listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
