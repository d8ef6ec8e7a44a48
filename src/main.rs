use actix_web::middleware::NormalizePath;
use actix_web::web::{self, Data};
use actix_web::{App, HttpResponse, HttpServer, Responder, get};
use dotenvy::dotenv;

mod aggregate;
mod api;
mod config;
mod db;
mod docs;
mod error;
mod model;
mod routes;

use config::Config;
use db::init_db;
use error::ApiError;

use crate::docs::ApiDoc;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::info;
use tracing_appender::rolling;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "HRMS Lite API is running",
        "version": env!("CARGO_PKG_VERSION"),
        "docs": "/swagger-ui/",
        "endpoints": {
            "employees": "/api/employees",
            "attendance": "/api/attendance",
            "dashboard": "/api/dashboard"
        }
    }))
}

#[get("/health")]
async fn health(pool: Data<MySqlPool>) -> impl Responder {
    match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(pool.get_ref())
        .await
    {
        Ok(_) => HttpResponse::Ok().json(json!({
            "success": true,
            "status": "healthy",
            "database": "connected"
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(json!({
            "success": false,
            "status": "unhealthy",
            "database": "disconnected",
            "error": e.to_string()
        })),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let config = Config::from_env();

    // Rolling daily log
    let file_appender = rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url).await?;

    let server_addr = config.server_addr.clone();
    let config_data = config.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(config.clone()))
            // Malformed bodies and query strings get the same JSON error
            // shape as handler-level validation failures.
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                ApiError::Validation(err.to_string()).into()
            }))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                ApiError::Validation(err.to_string()).into()
            }))
            .service(index)
            .service(health)
            .configure(|cfg| routes::configure(cfg, config_data.clone()))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
