use actix_web::{App, HttpServer, web};
use tracing::info;
use tracing_subscriber::{Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod db;
mod shutdown;

use crate::api::{
    auth::AuthKeys,
    health::health_config,
    job::{JobService, handlers::job_config},
    validation,
};
use crate::shutdown::ShutdownCoordinator;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration from environment
    let config::Config {
        database_url,
        jwt_secret,
        bind_addr,
        max_payload_size,
        max_db_connections,
        log_dir,
    } = config::Config::from_env().expect("Failed to load configuration");

    std::fs::create_dir_all(&log_dir).expect("Failed to create logs directory");

    // File-based logging with daily rotation, plus console output.
    // Files land as logs/info.<date>.log and logs/error.<date>.log.
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let info_file = tracing_appender::rolling::daily(&log_dir, "info.log");
    let error_file = tracing_appender::rolling::daily(&log_dir, "error.log");

    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(info_file)
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

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
        .with(error_layer)
        .init();

    // Get database connection pool
    let pool = db::connection::get_connection(&database_url, max_db_connections)
        .await
        .expect("Failed to connect to database");

    info!("Starting jobly application");
    info!("Configuration loaded successfully:");
    info!("  - Bind address: {}", bind_addr);
    info!("  - Max payload size: {} bytes", max_payload_size);
    info!("  - Max database connections: {}", max_db_connections);
    info!("Database connection pool established");

    // Run migrations on startup
    db::migrations::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // Clone pool for the HTTP server (original closes during shutdown)
    let server_pool = pool.clone();

    let server = HttpServer::new(move || {
        let job_service = web::Data::new(JobService::new(server_pool.clone()));
        let auth_keys = web::Data::new(AuthKeys::from_secret(&jwt_secret));

        let payload_config = web::PayloadConfig::default().limit(max_payload_size);

        App::new()
            .app_data(web::Data::new(server_pool.clone())) // Share DB pool across workers
            .app_data(job_service)
            .app_data(auth_keys)
            .app_data(payload_config)
            .app_data(validation::json_config())
            .app_data(validation::query_config())
            .configure(health_config)
            .configure(job_config)
    });

    info!("Server starting on http://{}", bind_addr);

    let server = server.bind(bind_addr.as_str())?.run();

    // Get server handle for graceful shutdown, then run it in the background
    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    ShutdownCoordinator::new(server_handle, server_task, pool)
        .wait_for_shutdown()
        .await
}
