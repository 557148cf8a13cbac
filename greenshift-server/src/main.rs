use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_multipart::form::MultipartFormConfig;
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;

use greenshift_server::application::auth_service::AuthService;
use greenshift_server::application::product_service::ProductService;
use greenshift_server::data::oracle_client::{AnalysisOracle, GeminiOracleClient};
use greenshift_server::data::product_repository::{PostgresProductRepository, ProductRepository};
use greenshift_server::data::user_repository::{PostgresUserRepository, UserRepository};
use greenshift_server::domain::error::DomainError;
use greenshift_server::infrastructure::config::AppConfig;
use greenshift_server::infrastructure::database::{create_pool, run_migrations};
use greenshift_server::infrastructure::logging::init_logging;
use greenshift_server::infrastructure::security::JwtKeys;
use greenshift_server::infrastructure::storage::FileStore;
use greenshift_server::presentation::handlers;
use greenshift_server::presentation::middleware::{
    JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let user_repo: Arc<dyn UserRepository> = Arc::new(PostgresUserRepository::new(pool.clone()));
    let product_repo: Arc<dyn ProductRepository> =
        Arc::new(PostgresProductRepository::new(pool.clone()));
    let oracle: Arc<dyn AnalysisOracle> = Arc::new(GeminiOracleClient::new(
        config.oracle.base_url.clone(),
        config.oracle.model.clone(),
        config.oracle.api_key.clone(),
        Duration::from_secs(config.oracle.timeout_secs),
    )?);
    let store = FileStore::init(&config.upload_dir).await?;

    let auth_service = AuthService::new(user_repo, JwtKeys::new(config.jwt_secret.clone()));
    let product_service = ProductService::new(product_repo, oracle, store);

    let config_data = config.clone();

    HttpServer::new(move || {
        let cors = build_cors(&config_data);
        App::new()
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(cors)
            .app_data(web::JsonConfig::default().error_handler(|err, _| {
                DomainError::Validation(err.to_string()).into()
            }))
            .app_data(
                MultipartFormConfig::default()
                    .error_handler(|err, _| DomainError::Validation(err.to_string()).into()),
            )
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(product_service.clone()))
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(health))
                    .service(handlers::auth::scope())
                    .service(
                        web::scope("/products")
                            .wrap(JwtAuthMiddleware::new(auth_service.keys().clone()))
                            .service(handlers::product::upload_product)
                            .service(handlers::product::list_products)
                            .service(handlers::product::get_product),
                    ),
            )
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: DateTime<Utc>,
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}
