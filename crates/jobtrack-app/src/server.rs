use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use tracing::info;

use jobtrack::config::Config;
use jobtrack::http::configure_routes;
use jobtrack::{Database, JobService};

/// Opens the store and serves the REST API until shutdown.
pub async fn run(config: &Config) -> anyhow::Result<()> {
    let db_path = config.database.resolved_path();
    let db = Database::open(&db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;
    let service = JobService::new(db);

    let (host, port) = config.server.bind_addr();
    info!(host = %host, port, db = %db_path.display(), "Starting jobtrack server");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(service.clone()))
            .configure(configure_routes)
    })
    .bind((host.as_str(), port))
    .with_context(|| format!("Failed to bind {}:{}", host, port))?
    .run()
    .await?;

    info!("Server stopped");
    Ok(())
}
