use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware};
use mentor_match::auth::AuthGate;
use mentor_match::config::Settings;
use mentor_match::core::{MentorMatcher, RankingService};
use mentor_match::models::ScoringWeights;
use mentor_match::routes::{self, AppState};
use mentor_match::services::{DirectoryClient, LlmRankingClient, UserDirectory};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, error};
use tracing_subscriber::EnvFilter;

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

fn build_ranking_service(settings: &Settings) -> Option<Arc<dyn RankingService>> {
    let api_key = settings.ranking.active_api_key()?;

    match LlmRankingClient::new(
        settings.ranking.endpoint.clone(),
        api_key.to_string(),
        settings.ranking.model.clone(),
        settings.ranking.max_tokens,
        settings.ranking.timeout(),
    ) {
        Ok(client) => {
            info!("AI ranking enabled (model: {})", client.model());
            Some(Arc::new(client))
        }
        Err(e) => {
            error!("Failed to create ranking client ({}), AI ranking disabled", e);
            None
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::load()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("Configuration error: {}", e)))?;

    // Initialize logging (LOG_LEVEL / LOG_FORMAT win over the config file)
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());
    init_logging(&log_level, &log_format);

    info!("Starting mentor matching service...");

    let directory_timeout = Duration::from_secs(settings.directory.timeout_secs.unwrap_or(10));
    let directory: Arc<dyn UserDirectory> = Arc::new(
        DirectoryClient::new(
            settings.directory.endpoint.clone(),
            settings.directory.api_key.clone(),
            settings.directory.project_id.clone(),
            settings.directory.database_id.clone(),
            settings.directory.users_collection.clone(),
            directory_timeout,
        )
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?,
    );

    info!("Directory client initialized ({})", settings.directory.endpoint);

    let ranking = build_ranking_service(&settings);
    if ranking.is_none() {
        warn!("AI ranking not configured, all requests will use score fallback");
    }

    let weights = ScoringWeights {
        major: settings.scoring.weights.major,
        industry: settings.scoring.weights.industry,
        location: settings.scoring.weights.location,
    };

    let matcher = MentorMatcher::new(ranking, settings.ranking.timeout(), weights);

    info!("Matcher initialized: {:?}", matcher);

    let app_state = AppState {
        directory,
        auth: Arc::new(AuthGate::new(&settings.auth.jwt_secret)),
        matcher,
        max_candidates: settings.matching.max_candidates,
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(routes::json_config())
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
