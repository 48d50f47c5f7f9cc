use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use gram_seva::config::{LoggingSettings, Settings};
use gram_seva::core::{KeywordMatcher, Recommender};
use gram_seva::metrics::QueryMetrics;
use gram_seva::models::KeywordWeights;
use gram_seva::routes::{self, handle_json_payload_error, AppState};
use gram_seva::services::{AppwriteClient, AppwriteCollections, CatalogStore, HuggingFaceClient, InMemoryCatalog};
use std::io;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if logging.is_pretty() {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

/// Pick the catalog backend: Appwrite when configured, otherwise a local seed file
fn build_catalog(settings: &Settings) -> io::Result<Arc<dyn CatalogStore>> {
    if let Some(appwrite) = &settings.appwrite {
        let collections = AppwriteCollections {
            services: settings.collection.services.clone(),
            chatbot_queries: settings.collection.chatbot_queries.clone(),
        };

        let client = AppwriteClient::new(
            appwrite.endpoint.clone(),
            appwrite.api_key.clone(),
            appwrite.project_id.clone(),
            appwrite.database_id.clone(),
            collections,
        )
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

        info!("Appwrite catalog initialized ({})", appwrite.endpoint);
        return Ok(Arc::new(client));
    }

    if let Some(seed_file) = &settings.catalog.seed_file {
        let catalog = InMemoryCatalog::from_json_file(seed_file)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?
            .with_query_log_capacity(settings.catalog.query_log_capacity);

        warn!("Using in-memory catalog from {}; query logs will not be persisted", seed_file);
        return Ok(Arc::new(catalog));
    }

    Err(io::Error::new(
        io::ErrorKind::InvalidInput,
        "No catalog configured: set [appwrite] or catalog.seed_file",
    ))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let loaded = Settings::load();
    let fallback_logging = LoggingSettings::default();
    init_logging(loaded.as_ref().map(|s| &s.logging).unwrap_or(&fallback_logging));

    info!("Starting Gram Seva recommendation service...");

    let settings = loaded.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    info!("Configuration loaded successfully");

    let catalog = build_catalog(&settings)?;

    let completion = HuggingFaceClient::new(
        settings.completion.endpoint.clone(),
        settings.completion.api_token.clone(),
        settings.completion.parameters(),
        settings.completion.timeout(),
    )
    .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    if !completion.has_credential() {
        warn!("No completion API token configured; recommendations will use keyword matching only");
    }

    let retry = settings.retry.policy();
    let weights = KeywordWeights::from(&settings.matching.weights);

    info!("Matcher initialized with weights: {:?}, retry: {:?}", weights, retry);

    let recommender = Recommender::new(
        catalog.clone(),
        Arc::new(completion),
        Arc::new(retry),
        KeywordMatcher::new(weights),
    );

    let app_state = AppState {
        catalog,
        recommender,
        metrics: Arc::new(QueryMetrics::new(settings.metrics.recent_capacity)),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
