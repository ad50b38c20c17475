use actix_web::{web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::config::app_config::AppConfig;
use crate::fcm::{
    build_http_client, HttpFcmClient, MessagingClient, ServiceAccount, ServiceAccountTokenProvider,
};
use crate::repository::{PgTokenRepository, TokenRepository};
use crate::services::cleanup_scheduler;
use crate::services::send_message_service::SendMessageService;
use crate::services::token_service::TokenService;

mod app;
mod config;
mod errors;
mod fcm;
mod handlers;
mod logger;
mod models;
mod repository;
mod services;
#[cfg(test)]
mod tests;

async fn setup_database(config: &AppConfig) -> anyhow::Result<PgPool> {
    log::info!("Conectando a Postgres...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("No se pudo conectar a la base de datos")?;

    // Verificar la conexión
    let conn = db_pool.acquire().await.context("Falló la conexión")?;
    drop(conn);

    Ok(db_pool)
}

/// Inicializa el logger. Si hay LOG_DB_URL, también el sink en base de datos.
async fn setup_logging(config: &AppConfig) -> anyhow::Result<()> {
    let Some(url) = config.log_db_url.as_deref() else {
        return logger::init_logger();
    };

    let rx = logger::init_logger_with_db(config.log_db_level)?;
    match logger::connect_log_db(url).await {
        Ok(pool) => {
            tokio::spawn(logger::run_db_sink(pool, rx));
            log::info!("Logs también se guardan en la base de logs");
        }
        Err(e) => {
            // Sin receptor los registros simplemente se descartan
            log::error!("No se pudo conectar a la base de logs: {:?}", e);
        }
    }
    Ok(())
}

fn setup_messaging(config: &AppConfig) -> anyhow::Result<Arc<dyn MessagingClient>> {
    log::info!(
        "Cargando credenciales de Firebase desde: {}",
        config.firebase_credentials_file
    );
    let account = ServiceAccount::from_file(&config.firebase_credentials_file)
        .context("Firebase initialization failed")?;
    let http_client = build_http_client(
        Duration::from_secs(config.http_connect_timeout_secs),
        Duration::from_secs(config.http_timeout_secs),
    )?;
    let token_provider = ServiceAccountTokenProvider::new(account, http_client.clone())
        .context("Firebase initialization failed")?;
    let project_id = token_provider.project_id().to_string();

    let client = HttpFcmClient::new(
        http_client,
        &config.fcm_base_url,
        &project_id,
        Arc::new(token_provider),
    );
    log::info!("Firebase inicializado para el proyecto {}", project_id);
    Ok(Arc::new(client))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok(); // Cargar .env al inicio
    let config = AppConfig::from_env()?;
    setup_logging(&config).await?;

    // Conectarnos a la DB y migrar
    let db_pool = setup_database(&config).await?;
    let pg_repository = PgTokenRepository::new(db_pool.clone());
    pg_repository.run_migrations().await?;
    let repository: Arc<dyn TokenRepository> = Arc::new(pg_repository);

    let messaging = setup_messaging(&config)?;

    let send_message_service = SendMessageService::new(repository.clone(), messaging);
    let token_service = TokenService::new(
        repository,
        send_message_service.clone(),
        config.token_ttl_days,
    );

    // Limpieza periódica de tokens viejos
    let schedule = cleanup_scheduler::parse_cron_str(&config.cleanup_cron)?;
    cleanup_scheduler::spawn_cleanup(schedule, token_service.clone());

    // Levantar servidor
    log::info!(
        "Levantando servidor en {}:{}",
        config.server_host,
        config.server_port
    );
    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(token_service.clone()))
            .app_data(web::Data::new(send_message_service.clone()))
            .configure(app::init_app)
    });
    if let Some(workers) = config.server_workers {
        server = server.workers(workers);
    }

    server
        .bind((config.server_host.as_str(), config.server_port))?
        .run()
        .await?;
    Ok(())
}
