use std::sync::Arc;

use identity_service::config::Config;
use identity_service::domain::auth::service::Authenticator;
use identity_service::domain::user::models::LoginId;
use identity_service::domain::user::models::RegisterUserCommand;
use identity_service::domain::user::ports::IdentityServicePort;
use identity_service::domain::user::service::IdentityService;
use identity_service::domain::user::service::TokenLifetimes;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::events::KafkaNotificationPublisher;
use identity_service::outbound::repositories::PostgresUserRepository;
use identity_service::user::errors::IdentityError;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        kafka_brokers = %config.kafka.brokers,
        kafka_topic = %config.kafka.topic,
        open_registration = config.auth.open_registration,
        require_verification = config.auth.require_verification,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let codec = Arc::new(auth::TokenCodec::new(config.auth.secret.as_bytes()));
    let repository = Arc::new(PostgresUserRepository::new(pg_pool));
    let notifier = Arc::new(KafkaNotificationPublisher::new(&config)?);

    let identity_service = Arc::new(IdentityService::new(
        Arc::clone(&repository),
        notifier,
        Arc::clone(&codec),
        TokenLifetimes {
            reset_seconds: config.auth.reset_token_lifetime_seconds,
            verification_seconds: config.auth.verification_token_lifetime_seconds,
        },
    ));

    let authenticator = Arc::new(Authenticator::new(
        Arc::clone(&repository),
        Arc::clone(&codec),
        config.auth.session_lifetime_seconds,
    ));

    bootstrap_first_superuser(&config, identity_service.as_ref()).await?;

    let auth_config = Arc::new(config.auth.clone());

    #[allow(unused_mut)]
    let mut http_application = create_router(
        Arc::clone(&identity_service),
        Arc::clone(&authenticator),
        auth_config,
    );

    #[cfg(feature = "oauth")]
    if let Some(oauth_config) = &config.oauth {
        http_application =
            http_application.merge(identity_service::inbound::http::oauth::router(oauth_config)?);
        tracing::info!("OAuth passthrough routes mounted");
    }

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, http_application).await?;

    Ok(())
}

/// Create the configured bootstrap superuser if it does not exist yet.
/// Idempotent across restarts: an existing account is left untouched.
async fn bootstrap_first_superuser(
    config: &Config,
    identity_service: &impl IdentityServicePort,
) -> Result<(), anyhow::Error> {
    let Some(first_superuser) = &config.auth.first_superuser else {
        return Ok(());
    };

    let login = LoginId::new(first_superuser.login.clone())?;
    let command = RegisterUserCommand::privileged(login, first_superuser.password.clone());

    match identity_service.register(command).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "Bootstrap superuser created");
            Ok(())
        }
        Err(IdentityError::AlreadyExists(_)) => {
            tracing::debug!("Bootstrap superuser already exists");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
