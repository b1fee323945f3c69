use actix_web::{web, App, HttpServer};
use tracing::info;
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

use headshot_studio::api::{
    download::download_config,
    generate::{
        handlers::{generate_config, status_config},
        GenerationService,
    },
    health::health_config,
    upload::upload_config,
    validation,
};
use headshot_studio::config::Config;
use headshot_studio::shutdown::ShutdownCoordinator;
use headshot_studio::store::JobStore;
use headshot_studio::worker::ProgressSimulator;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");

    std::fs::create_dir_all(&config.log_dir).expect("Failed to create logs directory");
    std::fs::create_dir_all(&config.upload_dir).expect("Failed to create upload directory");

    // File-based logging with daily rotation and level separation, plus
    // console output. Files land as logs/info.<date>.log etc.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let info_file = tracing_appender::rolling::daily(&config.log_dir, "info.log");
    let warn_file = tracing_appender::rolling::daily(&config.log_dir, "warn.log");
    let error_file = tracing_appender::rolling::daily(&config.log_dir, "error.log");

    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(info_file)
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    let warn_layer = tracing_subscriber::fmt::layer()
        .with_writer(warn_file)
        .with_ansi(false)
        .with_filter(LevelFilter::WARN);

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_file)
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(info_layer)
        .with(warn_layer)
        .with(error_layer)
        .init();

    info!("Starting headshot-studio application");
    info!("Configuration loaded successfully:");
    info!("  - Bind address: {}:{}", config.host, config.port);
    info!("  - Upload directory: {}", config.upload_dir.display());
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!(
        "  - Progress schedule: every {} ms over {:?}",
        config.progress_interval_ms, config.progress_steps
    );
    info!(
        "  - Failure: p={} after {} ms",
        config.failure_probability, config.failure_delay_ms
    );

    // Shutdown channel lets in-flight simulator tasks stop ticking.
    // watch channel allows multiple receivers to get the same value
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let store = JobStore::new();
    let simulator = ProgressSimulator::new(store.clone(), config.simulator(), shutdown_rx);
    let service = web::Data::new(GenerationService::new(store, simulator));
    let config_data = web::Data::new(config.clone());

    let max_payload_size = config.max_payload_size;

    let server = HttpServer::new(move || {
        // Configure payload size limits globally
        let payload_config = web::PayloadConfig::default().limit(max_payload_size);

        App::new()
            .app_data(service.clone())
            .app_data(config_data.clone())
            .app_data(payload_config)
            .app_data(validation::multipart_config(max_payload_size))
            .app_data(validation::json_config())
            .configure(health_config)
            .configure(upload_config)
            .configure(generate_config)
            .configure(status_config)
            .configure(download_config)
    });

    info!("Server starting on http://{}:{}", config.host, config.port);

    let server = server.bind((config.host.as_str(), config.port))?.run();

    // Get server handle for graceful shutdown
    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    let coordinator = ShutdownCoordinator::new(server_handle, server_task, shutdown_tx);
    coordinator.wait_for_shutdown().await
}
