mod config;
mod db;
mod dtos;
mod error;
mod handler;
mod middleware;
mod models;
mod routes;
mod service;
mod utils;

use std::sync::Arc;

use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use config::Config;
use dotenv::dotenv;
use routes::create_router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::filter::LevelFilter;

use crate::db::db::DBClient;
use service::{
    audit_service::AuditService, dispute_service::DisputeService,
    onboarding_service::OnboardingService, payment_service::PaymentService,
    rating_service::RatingService, storage_service::StorageService,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    pub audit_service: Arc<AuditService>,
    pub onboarding_service: Arc<OnboardingService>,
    pub rating_service: Arc<RatingService>,
    pub payment_service: Arc<PaymentService>,
    pub dispute_service: Arc<DisputeService>,
    pub storage_service: Arc<StorageService>,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config) -> Self {
        let db_client = Arc::new(db_client);

        let audit_service = Arc::new(AuditService::new(db_client.clone()));
        let onboarding_service = Arc::new(OnboardingService::new(
            db_client.clone(),
            audit_service.clone(),
        ));
        let rating_service = Arc::new(RatingService::new(
            db_client.clone(),
            audit_service.clone(),
        ));
        let payment_service = Arc::new(PaymentService::new(
            db_client.clone(),
            audit_service.clone(),
        ));
        let dispute_service = Arc::new(DisputeService::new(
            db_client.clone(),
            audit_service.clone(),
        ));
        let storage_service = Arc::new(StorageService::new(
            config.storage_base_url.clone(),
            &config.storage_signing_key,
            config.storage_url_ttl_secs,
        ));

        Self {
            env: config,
            db_client,
            audit_service,
            onboarding_service,
            rating_service,
            payment_service,
            dispute_service,
            storage_service,
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(LevelFilter::DEBUG)
        .init();

    dotenv().ok();

    let config = Config::init();

    let pool = match PgPoolOptions::new()
        .max_connections(20)
        .min_connections(5)
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            tracing::info!("connected to the database");
            pool
        }
        Err(err) => {
            tracing::error!("failed to connect to the database: {:?}", err);
            std::process::exit(1);
        }
    };

    let db_client = DBClient::new(pool);

    let allowed_origins = vec![
        config.app_url.parse::<HeaderValue>().expect("APP_URL must be a valid origin"),
        "http://localhost:5173".parse::<HeaderValue>().unwrap(),
        "http://localhost:8000".parse::<HeaderValue>().unwrap(),
    ];

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins))
        .allow_headers([AUTHORIZATION, ACCEPT, CONTENT_TYPE])
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::PATCH]);

    let app_state = Arc::new(AppState::new(db_client, config.clone()));

    let app = create_router(app_state.clone()).layer(cors);

    tracing::info!("server running on http://localhost:{}", config.port);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", &config.port))
        .await
        .unwrap();

    axum::serve(listener, app).await.unwrap();
}
