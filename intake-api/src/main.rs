use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use clap::{Parser, Subcommand};
use intake_api::config::ApiConfig;
use intake_api::helpers::database::initialize_database;
use intake_api::logging::init_logging;
use intake_api::middleware::{cors, AuthenticationMiddleware};
use intake_api::models::AppState;
use intake_api::routes::configure_routes;
use intake_api::storage::{Catalog, SqliteIntakeStore};
use intake_core::{hash_password, IntakeStore};
use intake_types::UserRole;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Questionnaire intake server
#[derive(Parser)]
#[command(name = "intake-api")]
#[command(about = "Serve questionnaires and collect answers")]
struct Cli {
    /// Config file (defaults to <config dir>/intake/api.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,
    /// Create a login account
    AddUser {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,

        /// Grant the admin role
        #[arg(long)]
        admin: bool,
    },
    /// Load questionnaires and questions from a TOML catalog
    Import {
        /// Path to the catalog file
        catalog: PathBuf,
    },
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded = ApiConfig::load(cli.config).context("Failed to load config")?;
    let _log_guard = init_logging(loaded.config.log_file().as_deref())?;
    loaded.log_summary();
    let config = loaded.config;

    let connection = initialize_database(&config.database.path).with_context(|| {
        format!(
            "Failed to open database at {}",
            config.database.path.display()
        )
    })?;
    let store = SqliteIntakeStore::new(connection);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(store, config).await,
        Commands::AddUser {
            username,
            password,
            admin,
        } => {
            let role = if admin {
                UserRole::Admin
            } else {
                UserRole::Standard
            };
            let password_hash = hash_password(&password)?;
            let id = store.create_user(&username, &password_hash, role)?;
            println!("Created {} user '{}' with id {}", role.as_str(), username, id);
            Ok(())
        }
        Commands::Import { catalog } => {
            let parsed = Catalog::from_path(&catalog)
                .with_context(|| format!("Failed to read catalog {}", catalog.display()))?;
            let summary = store.import_catalog(&parsed)?;
            println!(
                "Imported {} questionnaires with {} questions",
                summary.questionnaires, summary.questions
            );
            Ok(())
        }
    }
}

async fn serve(store: SqliteIntakeStore, config: ApiConfig) -> anyhow::Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let allowed_origins = config.allowed_origins().to_vec();

    let store: Arc<dyn IntakeStore> = Arc::new(store);
    let app_state = web::Data::new(AppState::new(store, config));

    info!("Starting intake-api server at http://{}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(AuthenticationMiddleware)
            .wrap(cors(&allowed_origins))
            .wrap(Logger::default())
            .configure(configure_routes)
    })
    .bind(&bind_addr)
    .with_context(|| format!("Failed to bind {}", bind_addr))?
    .run()
    .await?;

    Ok(())
}
