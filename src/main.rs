use actix_web::{App, HttpResponse, HttpServer, middleware::Logger, web};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sortie::{
  adapters::http::{
    AuthMiddleware, RequestIdMiddleware, configure_lookup_routes, configure_note_routes,
  },
  application::delivery::{
    CheckDocumentNumberUseCase, CreateNoteUseCase, DeleteNoteUseCase, GetNoteDetailsUseCase,
    GetProductDetailsUseCase, ListClientsByAgentUseCase, ListNotesUseCase, NotePolicy,
    RecomputeTotalUseCase, SuggestDocumentNumberUseCase, UpdateNoteUseCase,
  },
  domain::access::AccessPolicy,
  domain::catalog::ProductRepository,
  domain::delivery::{DeliveryNoteLedger, DeliveryNoteStore},
  domain::parties::{AgentRepository, ClientRepository},
  infrastructure::{
    config::Config,
    metrics,
    persistence::postgres::{
      PostgresAccessPolicy, PostgresAgentRepository, PostgresClientRepository,
      PostgresDeliveryNoteStore, PostgresProductRepository,
    },
  },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Initialize tracing subscriber for logging
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "sortie=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting Sortie delivery note service");

  // Load configuration
  let config = Config::load().expect("Failed to load configuration");
  tracing::info!("Configuration loaded successfully");

  // Set up database connection pool with timeout
  tracing::info!("Connecting to database: {}", config.database.url);

  let db_pool = tokio::time::timeout(
    Duration::from_secs(config.database.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.database.max_connections)
      .acquire_timeout(Duration::from_secs(config.database.acquire_timeout_seconds))
      .connect(&config.database.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds. Is PostgreSQL running?",
      config.database.connect_timeout_seconds
    );
    std::io::Error::new(
      std::io::ErrorKind::TimedOut,
      format!(
        "Database connection timed out after {} seconds",
        config.database.connect_timeout_seconds
      ),
    )
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    match e {
      sqlx::Error::Io(_) => std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        format!(
          "Could not connect to database. Is PostgreSQL running at {}?",
          config.database.url
        ),
      ),
      _ => std::io::Error::other(format!("Database error: {}", e)),
    }
  })?;

  tracing::info!("Database connection pool created");

  // Run database migrations
  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations")
    .run(&db_pool)
    .await
    .expect("Failed to run database migrations");
  tracing::info!("Database migrations completed");

  // Wire up repositories
  let note_store: Arc<dyn DeliveryNoteStore> =
    Arc::new(PostgresDeliveryNoteStore::new(db_pool.clone()));
  let products: Arc<dyn ProductRepository> =
    Arc::new(PostgresProductRepository::new(db_pool.clone()));
  let agents: Arc<dyn AgentRepository> = Arc::new(PostgresAgentRepository::new(db_pool.clone()));
  let clients: Arc<dyn ClientRepository> =
    Arc::new(PostgresClientRepository::new(db_pool.clone()));
  let access_policy: Arc<dyn AccessPolicy> = Arc::new(PostgresAccessPolicy::new(db_pool.clone()));

  // Domain service
  let ledger = Arc::new(DeliveryNoteLedger::new(
    note_store.clone(),
    products.clone(),
    agents.clone(),
    clients.clone(),
  ));

  let note_policy = NotePolicy {
    deliverer_required: config.delivery.deliverer_required,
    numbering_prefix: config.delivery.numbering_prefix.clone(),
  };

  // Use cases
  let list_use_case = Arc::new(ListNotesUseCase::new(ledger.clone()));
  let create_use_case = Arc::new(CreateNoteUseCase::new(ledger.clone(), note_policy.clone()));
  let get_use_case = Arc::new(GetNoteDetailsUseCase::new(ledger.clone()));
  let update_use_case = Arc::new(UpdateNoteUseCase::new(ledger.clone(), note_policy.clone()));
  let delete_use_case = Arc::new(DeleteNoteUseCase::new(ledger.clone()));
  let recompute_use_case = Arc::new(RecomputeTotalUseCase::new(ledger.clone()));
  let product_use_case = Arc::new(GetProductDetailsUseCase::new(products.clone()));
  let clients_use_case = Arc::new(ListClientsByAgentUseCase::new(clients.clone()));
  let check_use_case = Arc::new(CheckDocumentNumberUseCase::new(note_store.clone()));
  let suggest_use_case = Arc::new(SuggestDocumentNumberUseCase::new(
    note_store.clone(),
    note_policy.clone(),
  ));

  let server_host = config.server.host.clone();
  let server_port = config.server.port;

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  // Create and start the HTTP server
  HttpServer::new(move || {
    App::new()
      // Add request ID middleware
      .wrap(RequestIdMiddleware::new())
      // Add logging middleware
      .wrap(Logger::default())
      // Note CRUD (protected with AuthMiddleware)
      .service(
        web::scope("/api/v1/notes")
          .wrap(AuthMiddleware::new(access_policy.clone()))
          .configure(|cfg| {
            configure_note_routes(
              cfg,
              list_use_case.clone(),
              create_use_case.clone(),
              get_use_case.clone(),
              update_use_case.clone(),
              delete_use_case.clone(),
              recompute_use_case.clone(),
            )
          }),
      )
      // Editor lookups (protected with AuthMiddleware)
      .service(
        web::scope("/api/v1/lookups")
          .wrap(AuthMiddleware::new(access_policy.clone()))
          .configure(|cfg| {
            configure_lookup_routes(
              cfg,
              product_use_case.clone(),
              clients_use_case.clone(),
              check_use_case.clone(),
              suggest_use_case.clone(),
            )
          }),
      )
      // Operational endpoints
      .route(
        "/health",
        web::get().to(|| async { HttpResponse::Ok().json(serde_json::json!({"status": "ok"})) }),
      )
      .route("/metrics", web::get().to(metrics::metrics_handler))
  })
  .bind((server_host, server_port))?
  .run()
  .await
}
