use anyhow::Context as _;
use correlation_service::{ServiceConfig, create_app};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// JSON logs by default, human-readable with `LOG_FORMAT=pretty`
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "correlation_service=debug,task_flow=debug,tower_http=debug".into()
    });

    match log_format.as_str() {
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true),
                )
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServiceConfig::from_env().inspect_err(|e| {
        error!("Invalid configuration: {}", e);
    })?;

    let app = create_app(&config);
    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address()))?;
    let addr = listener.local_addr()?;

    info!("Radiology/lab correlation service starting on {}", addr);
    info!(origins = ?config.allowed_origins, "CORS allow-list");
    info!("Analysis endpoints: POST http://{}/analyze, POST http://{}/analyze_pdf", addr, addr);

    axum::serve(listener, app).await?;

    Ok(())
}
