//! Kitty API Server
//!
//! Main entry point for the Kitty backend service.

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kitty_api::{AppState, VerificationMailer, create_router};
use kitty_db::connect_with_pool;
use kitty_shared::{AppConfig, EmailService, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kitty=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    let db = connect_with_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    let jwt_service = JwtService::new(JwtConfig::from(&config.jwt));

    let mailer = VerificationMailer::from_service(EmailService::new(config.email.clone()));
    match &mailer {
        VerificationMailer::Smtp(_) => info!(
            smtp_host = %config.email.smtp_host,
            smtp_port = %config.email.smtp_port,
            "Verification mail enabled"
        ),
        VerificationMailer::LogOnly => info!("Verification mail disabled, logging only"),
    }

    let app = create_router(AppState::new(db, jwt_service, mailer));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
