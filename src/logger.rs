//! logger.rs
//! Configuración del logger usando env_logger, con un sink opcional que
//! además persiste los registros en una tabla `app_logs` de Postgres.

use chrono::{DateTime, Utc};
use log::{LevelFilter, Log, Metadata, Record};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Un registro ya formateado, listo para insertarse en la base.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub logged_at: DateTime<Utc>,
    pub level: String,
    pub target: String,
    pub message: String,
}

/// Logger compuesto: consola (env_logger) + canal hacia la base de logs.
pub struct PushLogger {
    console: env_logger::Logger,
    db_sink: Option<(UnboundedSender<LogEntry>, LevelFilter)>,
}

impl PushLogger {
    fn db_enabled(&self, metadata: &Metadata) -> bool {
        match &self.db_sink {
            Some((_, level)) => metadata.level() <= *level && !is_sink_target(metadata.target()),
            None => false,
        }
    }
}

// Evita que sqlx loguee sus propias inserciones en bucle
fn is_sink_target(target: &str) -> bool {
    target.starts_with("sqlx")
}

impl Log for PushLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.console.enabled(metadata) || self.db_enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if self.console.matches(record) {
            self.console.log(record);
        }
        if self.db_enabled(record.metadata()) {
            if let Some((tx, _)) = &self.db_sink {
                // Si el receptor ya no existe simplemente se descarta
                let _ = tx.send(LogEntry {
                    logged_at: Utc::now(),
                    level: record.level().to_string(),
                    target: record.target().to_string(),
                    message: record.args().to_string(),
                });
            }
        }
    }

    fn flush(&self) {
        self.console.flush();
    }
}

fn build_console_logger() -> env_logger::Logger {
    // Podrías leer la variable RUST_LOG del entorno para configurar el nivel.
    // Si no está, definimos un default.
    let log_env = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_env))
        .format_timestamp_secs()
        .build()
}

/// Inicializa solo la consola. Se usa antes de conocer la configuración.
pub fn init_logger() -> anyhow::Result<()> {
    install(build_console_logger(), None)
}

/// Inicializa consola + sink de base de datos.
/// Devuelve el receptor que debe drenarse con `run_db_sink`.
pub fn init_logger_with_db(level: LevelFilter) -> anyhow::Result<UnboundedReceiver<LogEntry>> {
    let (tx, rx) = mpsc::unbounded_channel();
    install(build_console_logger(), Some((tx, level)))?;
    Ok(rx)
}

fn install(
    console: env_logger::Logger,
    db_sink: Option<(UnboundedSender<LogEntry>, LevelFilter)>,
) -> anyhow::Result<()> {
    let max_level = match &db_sink {
        Some((_, level)) => console.filter().max(*level),
        None => console.filter(),
    };
    log::set_boxed_logger(Box::new(PushLogger { console, db_sink }))
        .map_err(|e| anyhow::anyhow!("No se pudo instalar el logger: {}", e))?;
    log::set_max_level(max_level);
    Ok(())
}

/// Conecta a la base de logs y crea la tabla si no existe.
pub async fn connect_log_db(url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(url)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS app_logs (
            id BIGSERIAL PRIMARY KEY,
            logged_at TIMESTAMPTZ NOT NULL,
            level TEXT NOT NULL,
            target TEXT NOT NULL,
            message TEXT NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await?;

    Ok(pool)
}

/// Drena el canal e inserta cada registro. Termina cuando se cierran los emisores.
pub async fn run_db_sink(pool: sqlx::Pool<Postgres>, mut rx: UnboundedReceiver<LogEntry>) {
    while let Some(entry) = rx.recv().await {
        let res = sqlx::query(
            r#"
            INSERT INTO app_logs (logged_at, level, target, message)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(entry.logged_at)
        .bind(&entry.level)
        .bind(&entry.target)
        .bind(&entry.message)
        .execute(&pool)
        .await;

        if let Err(e) = res {
            // No usamos log:: aquí, volvería a entrar al canal
            eprintln!("No se pudo guardar log en DB: {}", e);
        }
    }
}
