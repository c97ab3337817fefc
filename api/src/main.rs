use api::app;
use api::startup::{build_pipeline, session_timing};
use api::state::AppState;
use std::net::SocketAddr;
use tracing_appender::rolling;
use util::config::{self, AppConfig};

#[tokio::main]
async fn main() {
    let _log_guard = init_logging(&config::log_file(), &config::log_level());
    tracing::debug!(config = ?*AppConfig::global(), "configuration loaded");

    let pipeline = build_pipeline().await.unwrap_or_else(|err| {
        tracing::error!(error = %err, "startup failed");
        eprintln!("startup failed: {err}");
        std::process::exit(1);
    });

    let (session_ttl, sweep_every) = session_timing();
    let state = AppState::with_session_ttl(pipeline, session_ttl);
    state.sessions().spawn_sweeper(sweep_every);
    tracing::info!(ttl_secs = session_ttl.as_secs(), "idle sessions expire");

    let app = app(state);

    let addr: SocketAddr = format!("{}:{}", config::host(), config::port())
        .parse()
        .expect("Invalid address");

    tracing::info!(
        "Starting {} on http://{}:{}",
        config::project_name(),
        config::host(),
        config::port()
    );

    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("Server crashed");
}

fn init_logging(log_file: &str, log_level: &str) -> tracing_appender::non_blocking::WorkerGuard {
    use std::fs;
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    let stdout_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true)
        .with_thread_ids(true);

    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| {
        EnvFilter::new("api=info,services=info,marker=info,db=info")
    });

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    if config::log_to_stdout() {
        registry.with(stdout_layer).init();
    } else {
        registry.init();
    }

    guard
}
