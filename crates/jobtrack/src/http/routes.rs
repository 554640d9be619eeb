//! API routes configuration

use actix_web::{web, HttpRequest};

use super::handlers;
use super::HttpError;

/// Configure API routes.
///
/// `/api/jobs` and `/api/jobs/` both reach the collection handlers.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .route("/health", web::get().to(handlers::health))
            .service(
                web::scope("/jobs")
                    .route("", web::get().to(handlers::list_jobs))
                    .route("", web::post().to(handlers::create_job))
                    .route("/", web::get().to(handlers::list_jobs))
                    .route("/", web::post().to(handlers::create_job))
                    .route("/{id}", web::put().to(handlers::update_job))
                    .route("/{id}", web::delete().to(handlers::delete_job)),
            ),
    );
}

/// JSON extractor config that turns malformed bodies into a 400 with the
/// same `{ "message": ... }` shape as service errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(64 * 1024)
        .error_handler(|err, _req: &HttpRequest| {
            HttpError::BadRequest(format!("Invalid request body: {}", err)).into()
        })
}
