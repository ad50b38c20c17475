//! repository/token_repository.rs

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::token_model::UserToken;

#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn exists_by_token(&self, token: &str) -> Result<bool>;

    async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<UserToken>>;

    /// Inserta el token y devuelve la fila con su id.
    /// `None` si el token ya estaba registrado (clave única).
    async fn save(&self, token: UserToken) -> Result<Option<UserToken>>;

    /// Devuelve cuántas filas se borraron.
    async fn delete_by_token(&self, token: &str) -> Result<u64>;

    async fn delete_by_time_before(&self, cutoff: DateTime<Utc>) -> Result<u64>;
}

#[derive(Clone, Debug)]
pub struct PgTokenRepository {
    db_pool: PgPool,
}

impl PgTokenRepository {
    pub fn new(db_pool: PgPool) -> Self {
        PgTokenRepository { db_pool }
    }

    /// Corre migraciones con sqlx
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db_pool)
            .await
            .context("Fallo en migraciones de 'user_tokens'")?;
        Ok(())
    }
}

#[async_trait]
impl TokenRepository for PgTokenRepository {
    async fn exists_by_token(&self, token: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM user_tokens WHERE token = $1)")
                .bind(token)
                .fetch_one(&self.db_pool)
                .await
                .context("Fallo al comprobar existencia de token")?;
        Ok(exists)
    }

    async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<UserToken>> {
        sqlx::query_as::<_, UserToken>(
            r#"
            SELECT id, token, user_id, time
            FROM user_tokens
            WHERE user_id = $1
            ORDER BY id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db_pool)
        .await
        .context("Fallo al listar tokens del usuario")
    }

    async fn save(&self, token: UserToken) -> Result<Option<UserToken>> {
        sqlx::query_as::<_, UserToken>(
            r#"
            INSERT INTO user_tokens (token, user_id, time)
            VALUES ($1, $2, $3)
            ON CONFLICT (token) DO NOTHING
            RETURNING id, token, user_id, time
            "#,
        )
        .bind(&token.token)
        .bind(&token.user_id)
        .bind(token.time)
        .fetch_optional(&self.db_pool)
        .await
        .context("Fallo al insertar token")
    }

    async fn delete_by_token(&self, token: &str) -> Result<u64> {
        let res = sqlx::query("DELETE FROM user_tokens WHERE token = $1")
            .bind(token)
            .execute(&self.db_pool)
            .await
            .context("Fallo al borrar token")?;
        Ok(res.rows_affected())
    }

    async fn delete_by_time_before(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let res = sqlx::query("DELETE FROM user_tokens WHERE time < $1")
            .bind(cutoff)
            .execute(&self.db_pool)
            .await
            .context("Fallo al borrar tokens viejos")?;
        Ok(res.rows_affected())
    }
}
