//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{
        catalog::StaticCatalog, reviews::InMemoryReviewStore, sessions::InMemorySessionBinder,
        tokens::JwtTokenService, users::InMemoryCredentialStore, users::PlainTextVerifier,
    },
    config::Config,
    error::ApiError,
    web::{self, state::AppState, ApiDoc},
};
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    Method,
};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Build the Stores and Services ---
    // Plain equality keeps the original credential contract; the verifier
    // seam is where a hashing implementation would slot in.
    let verifier = Arc::new(PlainTextVerifier);
    let users = Arc::new(InMemoryCredentialStore::new(verifier));
    let tokens = Arc::new(JwtTokenService::new(&config.token_secret));
    let sessions = Arc::new(InMemorySessionBinder::new());
    let reviews = Arc::new(InMemoryReviewStore::new());
    let catalog = Arc::new(StaticCatalog::seeded());
    info!("Stores initialized; catalog seeded with the stock book table.");

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        users,
        tokens,
        sessions,
        reviews,
        catalog,
        config: config.clone(),
    });

    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 4. Create the Web Router ---
    let api_router = web::router(app_state).layer(cors);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
