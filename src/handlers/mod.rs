//! handlers/mod.rs
//! Módulo que agrupa los distintos handlers (tokens, envío, documentación).
pub mod docs_handler;
pub mod send_handler;
pub mod token_handler;
