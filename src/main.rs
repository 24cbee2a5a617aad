//! # Cipher Web Server Binary
//!
//! Runs the substitution cipher HTTP API.
//!
//! ## Usage
//!
//! ```bash
//! # Basic usage with defaults (0.0.0.0:5000)
//! cipher-web
//!
//! # Custom configuration
//! cipher-web --bind 127.0.0.1:8080 --log-level debug --enable-metrics true
//!
//! # With environment variables
//! export CIPHER_WEB_BIND_ADDR=0.0.0.0:5000
//! export LOG_LEVEL=info
//! cipher-web
//! ```

use cipher_web::{server::ServerConfig, start_server};
use std::process;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the cipher web server
///
/// ## Exit Codes
/// - 0: Clean shutdown
/// - 1: Configuration error
/// - 2: Server startup error
/// - 3: Runtime error
fn main() {
    let config = ServerConfig::from_args();

    if let Err(e) = setup_logging(&config) {
        eprintln!("Failed to initialize logging: {e}");
        process::exit(1);
    }

    info!("Starting Cipher Web Server v{}", cipher_web::VERSION);
    info!("Configuration: {:?}", config);

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e.internal_message());
        process::exit(1);
    }

    let worker_threads = config.get_worker_threads();
    info!("Using {} worker threads", worker_threads);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(worker_threads)
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to build Tokio runtime: {}", e);
            process::exit(2);
        }
    };

    let exit_code = runtime.block_on(run(config));
    process::exit(exit_code);
}

/// Serve until the server fails or a shutdown signal arrives
async fn run(config: ServerConfig) -> i32 {
    display_startup_info(&config);

    tokio::select! {
        result = start_server(config) => {
            match result {
                Ok(()) => {
                    info!("Server shut down cleanly");
                    0
                }
                Err(e) => {
                    error!("Server error: {}", e.internal_message());
                    if e.is_critical() { 2 } else { 3 }
                }
            }
        }

        () = shutdown_signal() => {
            info!("Received shutdown signal, stopping server...");
            0
        }
    }
}

/// Setup structured logging based on configuration
///
/// ## Log Format
/// - **Development**: Pretty-printed with colors
/// - **Production** (`ENVIRONMENT=production`): JSON lines
fn setup_logging(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let is_production = std::env::var("ENVIRONMENT")
        .map(|env| env.to_lowercase() == "production")
        .unwrap_or(false);

    let env_filter = EnvFilter::builder()
        .with_default_directive(config.log_level.inner().into())
        .from_env()?
        .add_directive("hyper=info".parse()?)
        .add_directive("tokio=info".parse()?)
        .add_directive("mio=warn".parse()?);

    if is_production {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(true)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true),
            )
            .init();

        info!("Initialized structured JSON logging for production");
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_thread_names(false),
            )
            .init();

        info!("Initialized pretty-printed logging for development");
    }

    Ok(())
}

/// Completes on SIGINT or SIGTERM
///
/// If a handler cannot be installed that signal is logged and ignored.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT (Ctrl+C)");
        },
        () = terminate => {
            info!("Received SIGTERM");
        },
    }
}

/// Log the effective configuration and the endpoint URLs
fn display_startup_info(config: &ServerConfig) {
    let enabled = |flag: bool| if flag { "enabled" } else { "disabled" };

    info!("=== Cipher Web Server Configuration ===");
    info!("Bind Address: {}", config.bind_addr);
    info!("Log Level: {}", config.log_level);
    info!("Max Payload Size: {} bytes", config.max_payload_size);
    info!("Request Timeout: {}ms", config.request_timeout_ms);
    info!("Health Check: {}", enabled(config.enable_health_check));
    info!("Metrics: {}", enabled(config.enable_metrics));

    for kind in cipher_web::CipherKind::ALL {
        info!("{} endpoint: http://{}{}", kind, config.bind_addr, kind.path());
    }
    if config.enable_health_check {
        info!("Health endpoint: http://{}/health", config.bind_addr);
    }
    if config.enable_metrics {
        info!("Metrics endpoint: http://{}/metrics", config.bind_addr);
    }
    info!("=======================================");
}
