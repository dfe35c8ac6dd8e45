//! webpay server binary.

use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use webpay::adapters::http::{payment_router, PaymentAppState};
use webpay::adapters::{
    HttpMarketplaceNotifier, HttpProviderClient, InMemoryDeadLetterStore, InMemoryJobQueue,
    InMemorySessionStore, NotificationWorker, ProviderApiConfig, RedisDeadLetterStore,
    RedisSessionStore, RetryPolicy,
};
use webpay::config::{AppConfig, SessionBackend};
use webpay::ports::{DeadLetterStore, SessionStore};

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn session_store(config: &AppConfig) -> Result<Arc<dyn SessionStore>, Box<dyn std::error::Error>> {
    match config.session.backend {
        SessionBackend::Memory => {
            tracing::warn!("Using in-memory sessions; sessions are lost on restart");
            Ok(Arc::new(InMemorySessionStore::new()))
        }
        SessionBackend::Redis => {
            let url = config.session.redis_url.as_deref().unwrap_or_default();
            let store = RedisSessionStore::connect(url, config.session.ttl_secs).await?;
            Ok(Arc::new(store))
        }
    }
}

/// Dead letters share the session backend so they survive restarts in
/// Redis deployments.
async fn dead_letter_store(
    config: &AppConfig,
) -> Result<Arc<dyn DeadLetterStore>, Box<dyn std::error::Error>> {
    let store: Arc<dyn DeadLetterStore> = match config.session.backend {
        SessionBackend::Memory => {
            tracing::warn!("Using in-memory dead letters; undelivered notifications are lost on restart");
            Arc::new(InMemoryDeadLetterStore::new())
        }
        SessionBackend::Redis => {
            let url = config.session.redis_url.as_deref().unwrap_or_default();
            Arc::new(RedisDeadLetterStore::connect(url).await?)
        }
    };

    let pending = store.list().await?;
    if !pending.is_empty() {
        tracing::warn!(
            dead_letters = pending.len(),
            "Undelivered marketplace notifications need operator attention"
        );
    }
    Ok(store)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    tracing::info!(
        environment = ?config.server.environment,
        providers = ?config.spa.supported_providers,
        spa_enabled = config.spa.enabled,
        "Starting webpay"
    );

    let session_store = session_store(&config).await?;

    let provider_client = HttpProviderClient::new(
        ProviderApiConfig::new(
            config.provider.api_url.clone(),
            config.provider.oauth_key.clone(),
            config.provider.oauth_secret.clone(),
        )
        .with_timeout(config.provider.timeout()),
    )?;

    let notifier = HttpMarketplaceNotifier::new(
        config.notification.marketplace_url.clone(),
        config.notification.timeout(),
    )?;
    let (job_queue, receiver) = InMemoryJobQueue::new();
    let worker = NotificationWorker::new(
        receiver,
        Arc::new(notifier),
        dead_letter_store(&config).await?,
        RetryPolicy::new(config.notification.max_attempts, config.notification.retry_delay()),
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker_handle = tokio::spawn(worker.run(shutdown_rx));

    let state = PaymentAppState {
        session_store,
        provider_client: Arc::new(provider_client),
        job_queue: Arc::new(job_queue),
        spa: Arc::new(config.spa.clone()),
        default_provider: config.provider.default_provider,
        cookie_name: Arc::from(config.session.cookie_name.as_str()),
        provider_timeout: config.provider.timeout(),
    };
    let app = payment_router(state, config.server.request_timeout());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Requests still being served may queue notifications; stop the worker
    // only once they have drained.
    let _ = shutdown_tx.send(true);

    if let Err(e) = worker_handle.await {
        tracing::error!(error = %e, "Notification worker panicked");
    }
    tracing::info!("Server stopped");
    Ok(())
}
