mod api;
mod metrics;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use supportflow_core::{
    load_config, validate_config, BatchDriver, ChatCompletionsClient, CsvCustomerDirectory,
    CustomerDirectory, EmailDrafter, IssueClassifier, JiraClient, LlmClient, RetryPolicy,
    SmtpMailer, SqliteTicketStore, SupportPipeline, TicketStore, WebhookNotifier,
};

use api::create_router;
use state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("SUPPORTFLOW_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(version = VERSION, config_hash = &config_hash[..16], "Configuration loaded");

    // Create SQLite ticket store
    let ticket_store: Arc<dyn TicketStore> = Arc::new(
        SqliteTicketStore::new(&config.database.path).context("Failed to create ticket store")?,
    );
    info!("Ticket store initialized at {:?}", config.database.path);

    // Load customer directory if configured
    let directory: Arc<dyn CustomerDirectory> = match &config.directory.customers_csv {
        Some(path) => {
            let directory = CsvCustomerDirectory::load(path)
                .with_context(|| format!("Failed to load customer directory from {:?}", path))?;
            info!(customers = directory.len(), "Customer directory loaded");
            Arc::new(directory)
        }
        None => {
            info!("No customer directory configured; every lookup will miss");
            Arc::new(CsvCustomerDirectory::empty())
        }
    };

    // Chat-completions client, shared by classification and drafting. With
    // no [llm] section the client exists but reports NotConfigured, which
    // degrades classification to "Other" and disables drafting.
    let llm_config = config.llm.clone().unwrap_or_default();
    if config.llm.is_none() {
        info!("LLM not configured; classification degrades to Other, drafting is unavailable");
    } else {
        info!(model = %llm_config.model, "LLM client configured");
    }
    let llm: Arc<dyn LlmClient> = Arc::new(ChatCompletionsClient::new(&llm_config));

    let tracker = JiraClient::new(config.tracker.clone().unwrap_or_default());
    if config.tracker.is_none() {
        info!("Issue tracker not configured; issues will record JIRA-CONFIG-ERROR");
    }

    let notifier = WebhookNotifier::new(config.notifier.clone().unwrap_or_default());
    if config.notifier.is_none() {
        info!("Notifier not configured; notifications will fail softly");
    }

    let mailer = SmtpMailer::new(config.email.clone());
    if config.email.is_none() {
        info!("Mailer not configured; outbound email is unavailable");
    }

    let pipeline = Arc::new(SupportPipeline::new(
        directory,
        Arc::clone(&ticket_store),
        IssueClassifier::new(Arc::clone(&llm), RetryPolicy::standard()),
        Arc::new(tracker),
        Arc::new(notifier),
        EmailDrafter::new(llm),
        Arc::new(mailer),
    ));

    let batch = BatchDriver::new(
        Arc::clone(&pipeline),
        config.batch.queries_csv.clone(),
        RetryPolicy::standard(),
    );
    info!("Pipeline assembled");

    // Create app state and router
    let state = Arc::new(AppState::new(config.clone(), pipeline, batch, ticket_store));
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
