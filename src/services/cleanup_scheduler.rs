//! services/cleanup_scheduler.rs
//! Tarea periódica (cron) que borra los tokens viejos.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use cron::Schedule;
use std::str::FromStr;
use tokio::task::JoinHandle;

use crate::services::token_service::TokenService;

/// Acepta expresiones de 5 campos (sin segundos) o de 6.
pub fn parse_cron_str(cron_str: &str) -> Result<Schedule> {
    let fields: Vec<&str> = cron_str.split_whitespace().collect();
    if !(5..=6).contains(&fields.len()) {
        return Err(anyhow!("Invalid cron expression: {}", cron_str));
    }
    let cron_str = if fields.len() == 5 {
        "0 ".to_string() + &fields.join(" ")
    } else {
        fields.join(" ")
    };

    Schedule::from_str(&cron_str)
        .map_err(|err| anyhow!("Failed to parse cron expression: {} {}", cron_str, err))
}

/// Próxima ejecución estrictamente posterior a `after`.
pub fn next_run(schedule: &Schedule, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
    schedule.after(&after).next()
}

/// Lanza el bucle de limpieza. Los errores se loguean y el bucle sigue.
pub fn spawn_cleanup(schedule: Schedule, token_service: TokenService) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let now = Utc::now();
            let Some(next) = next_run(&schedule, now) else {
                log::warn!("La expresión cron no tiene más ejecuciones, se detiene la limpieza");
                return;
            };
            log::info!("Próxima limpieza de tokens: {}", next);

            let wait = (next - now).to_std().unwrap_or_default();
            tokio::time::sleep(wait).await;

            if let Err(e) = token_service.cleanup_old_tokens().await {
                log::error!("Fallo en la limpieza de tokens: {:?}", e);
            }
        }
    })
}
