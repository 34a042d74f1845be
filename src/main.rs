use affect_orchestrator::{
    create_router, AnalysisBackend, AnalysisFrameTransport, AppState, AudioBackend,
    CaptureBackendFactory, CaptureController, Config, FrameTransport, HttpAnalysisClient,
    NatsClient, SessionHandle, SessionOrchestrator, VideoBackend,
};
use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "affect-orchestrator")]
#[command(about = "Capture and aggregation service for the affect analysis dashboard")]
struct Args {
    /// Config file path (extension optional)
    #[arg(short, long, default_value = "config/affect-orchestrator")]
    config: String,

    /// Override the HTTP port from the config file
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config))?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Analysis backend: {}", cfg.backend.base_url);

    let session_config = cfg.capture.session();
    info!("Session: {}", session_config.session_id);

    let backend: Arc<dyn AnalysisBackend> = Arc::new(HttpAnalysisClient::new(&cfg.backend.base_url)?);

    let video = CaptureBackendFactory::video(cfg.capture.video(), cfg.capture.frame_interval())?;
    let audio = CaptureBackendFactory::audio(cfg.capture.audio(), cfg.capture.audio_chunk())?;
    info!("Capture devices: video={}, audio={}", video.name(), audio.name());
    let capture = CaptureController::new(video, audio);

    let (results_tx, results_rx) = mpsc::channel(64);

    let nats = match &cfg.nats {
        Some(nats) => match NatsClient::connect(&nats.url, session_config.session_id.clone()).await {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("NATS unavailable ({:#}), streaming through the face endpoint", e);
                None
            }
        },
        None => None,
    };

    let transport: Arc<dyn FrameTransport> = match nats {
        Some(client) => {
            let subscriber = client.subscribe_results().await?;
            client.spawn_result_listener(subscriber, results_tx);
            info!("Streaming frames to {}", client.frame_subject());
            Arc::new(client)
        }
        None => Arc::new(AnalysisFrameTransport::new(Arc::clone(&backend), results_tx)),
    };

    let orchestrator = SessionOrchestrator::new(session_config, capture, backend, transport);
    let (session, session_task) = SessionHandle::spawn(orchestrator, results_rx);

    let app = create_router(AppState::new(session.clone()));

    let port = args.port.unwrap_or(cfg.service.http.port);
    let addr = format!("{}:{}", cfg.service.http.bind, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    if let Err(e) = session.shutdown().await {
        warn!("Session shutdown: {}", e);
    }
    let _ = session_task.await;

    Ok(())
}
