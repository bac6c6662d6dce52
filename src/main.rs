//! cloudflare-error-page
//!
//! Renders Cloudflare-style edge error pages from the command line, and serves
//! them from a small demo HTTP server.
//! This is the main entry point that initializes the server and handles subcommands.

mod cli;
mod commands;
mod config;
mod handlers;
mod state;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};
use tracing::{error, info, Level};

use cli::{Args, Commands, LogLevel};
use commands::{command_config, command_render, command_resources};
use config::{resolve_config, show_config, validate_effective_config, Config, DEFAULT_BIND_ADDR, DEFAULT_PORT};
use handlers::{error_page_handler, resource_handler, root_handler};
use state::{AppState, SharedState};

/// Initializes tracing logging subsystem with configured log level.
///
/// Logs go to stderr so rendered pages can be streamed on stdout.
fn setup_logging(config: &Config) {
    let log_level = match config.log_level() {
        LogLevel::Off => return,
        LogLevel::Error => Level::ERROR,
        LogLevel::Warn => Level::WARN,
        LogLevel::Info => Level::INFO,
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Trace => Level::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return;
    }

    info!("Logging initialized with level: {:?}", log_level);
}

/// Helper function to load and validate configuration.
/// Exits the process with error code 1 if validation fails.
fn load_validated_config(args: &Args) -> Result<Config> {
    let config = resolve_config(args)?;
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }
    Ok(config)
}

/// Resolves once either SIGINT or SIGTERM arrives.
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
            Ok(mut stream) => {
                stream.recv().await;
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
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C), shutting down gracefully...");
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        }
    }
}

/// Builds the demo server routes.
fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/error", get(error_page_handler))
        .route("/cdn-cgi/{*path}", get(resource_handler))
        .with_state(state)
}

/// Main application entry point.
#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, &args.config_format);
    }

    // Handle subcommands
    if let Some(command) = &args.command {
        let config = load_validated_config(&args)?;
        setup_logging(&config);

        return match command {
            Commands::Render {
                params,
                preset,
                output,
                no_html,
                local_assets,
            } => {
                let mut options = config.render_options();
                if *no_html {
                    options.allow_html = false;
                }
                if *local_assets {
                    options.use_cdn = false;
                }
                command_render(params.clone(), *preset, output.clone(), options)
            }

            Commands::Resources { output } => command_resources(output.clone()),

            Commands::Config {
                output,
                format,
                commented,
            } => command_config(output.clone(), format.clone(), *commented),
        };
    }

    // Load configuration for main server mode
    let config = load_validated_config(&args)?;
    setup_logging(&config);

    info!("Starting cloudflare-error-page demo server");

    let bind_ip_str = config.bind.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
    let port = config.port.unwrap_or(DEFAULT_PORT);
    let addr: SocketAddr = format!("{}:{}", bind_ip_str, port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", bind_ip_str, port))?;

    let state: SharedState = Arc::new(AppState::new(config.clone()));
    info!(
        "Rendering with allow_html={} use_cdn={}",
        state.render_options.allow_html, state.render_options.use_cdn
    );

    let app = build_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(
        "cloudflare-error-page listening on http://{}:{}",
        bind_ip_str, port
    );

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    );

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                error!("Server error: {}", e);
                return Err(e.into());
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received, exiting...");
        }
    }

    info!("cloudflare-error-page stopped gracefully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{self, Body},
        extract::connect_info::MockConnectInfo,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    fn test_router(config: Config) -> Router {
        let state = Arc::new(AppState::new(config));
        build_router(state).layer(MockConnectInfo(SocketAddr::from(([10, 0, 0, 1], 4321))))
    }

    async fn fetch(router: Router, uri: &str) -> (StatusCode, Option<String>, String) {
        let response = router
            .oneshot(
                Request::get(uri)
                    .header(header::HOST, "example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, content_type, String::from_utf8_lossy(&bytes).into_owned())
    }

    #[tokio::test]
    async fn test_stylesheet_served() {
        let (status, content_type, body) =
            fetch(test_router(Config::default()), "/cdn-cgi/styles/main.css").await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/css"));
        assert!(!body.is_empty());
    }

    #[tokio::test]
    async fn test_icon_served() {
        let (status, content_type, _) = fetch(
            test_router(Config::default()),
            "/cdn-cgi/images/cf-icon-cloud.svg",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("image/svg+xml"));
    }

    #[tokio::test]
    async fn test_unknown_resource_is_404() {
        let (status, _, _) =
            fetch(test_router(Config::default()), "/cdn-cgi/styles/missing.css").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_error_page_uses_host_and_peer() {
        let (status, content_type, body) = fetch(test_router(Config::default()), "/error").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(content_type.unwrap().starts_with("text/html"));
        assert!(body.contains("example.com"));
        assert!(body.contains("10.0.0.1"));
        assert!(body.contains("class=\"cf-error-source "));
    }

    #[tokio::test]
    async fn test_error_page_query_overrides() {
        let (status, _, body) = fetch(
            test_router(Config::default()),
            "/error?code=502&title=Bad%20gateway&source=host",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("Bad gateway"));
        assert!(body.contains("Error code 502"));
        assert!(body.contains("id=\"cf-host-status\" class=\"cf-error-source "));
    }

    #[tokio::test]
    async fn test_error_page_body_kept_for_non_error_codes() {
        for code in [103, 204, 304] {
            let (status, _, body) = fetch(
                test_router(Config::default()),
                &format!("/error?code={}", code),
            )
            .await;

            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(body.contains(&format!("Error code {}", code)));
        }
    }

    #[tokio::test]
    async fn test_root_page() {
        let (status, _, body) = fetch(test_router(Config::default()), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("/cdn-cgi/styles/main.css"));
        assert!(body.contains("0.0.0.0:8080"));
    }
}
