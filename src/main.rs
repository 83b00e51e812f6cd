// fruit-freshness - Fruit freshness analysis service
// Author: kelexine (https://github.com/kelexine)

use anyhow::Result;
use clap::Parser;
use fruit_freshness::analysis::Analyzer;
use fruit_freshness::capture::{Camera, CommandCamera};
use fruit_freshness::cli::Args;
use fruit_freshness::config::AppConfig;
use fruit_freshness::gemini::GeminiClient;
use fruit_freshness::report;
use fruit_freshness::server::create_router;
use fruit_freshness::translation::Translator;
use fruit_freshness::utils::logging;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let config = AppConfig::load(args.config.as_deref())?;

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting fruit-freshness v{}", env!("CARGO_PKG_VERSION"));

    if config.gemini.api_key.is_empty() {
        warn!("No Gemini API key configured; set GOOGLE_API_KEY or gemini.api_key");
    }

    // Phase 3: Build upstream clients
    let analyzer = Analyzer::new(
        GeminiClient::new(&config.gemini)?,
        Translator::new(&config.translation)?,
    );

    // Phase 3.5: One-shot analysis (--analyze)
    if let Some(image) = args.analyze.as_deref() {
        let result = analyzer.analyze(image, &args.language).await;
        println!("{}", result);

        if let Some(output) = args.report {
            let image = image.to_path_buf();
            let rendered = tokio::task::spawn_blocking(move || {
                report::generate_pdf_report(&image, &result, &output)
            })
            .await?;
            if !rendered {
                anyhow::bail!("Failed to generate report");
            }
        }
        return Ok(());
    }

    // Phase 4: Prepare storage
    tokio::fs::create_dir_all(&config.storage.upload_dir).await?;
    tokio::fs::create_dir_all(&config.storage.reports_dir).await?;

    // Phase 5: Build and start HTTP server
    let camera: Arc<dyn Camera> = Arc::new(CommandCamera::new(&config.camera));
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = create_router(config, analyzer, camera)?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 6: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
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
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
