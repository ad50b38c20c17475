//! services/mod.rs
//! Módulo que agrupa los distintos "servicios" o "capas de negocio" de la app.

pub mod cleanup_scheduler;
pub mod send_message_service;
pub mod token_service;
