//! repository/mod.rs
//! Acceso a la tabla `user_tokens`.

pub mod token_repository;

#[cfg(test)]
pub mod memory_repository;

pub use token_repository::{PgTokenRepository, TokenRepository};
