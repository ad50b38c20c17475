//! repository/memory_repository.rs
//! Implementación en memoria para los tests de servicios y handlers.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Mutex;

use super::TokenRepository;
use crate::models::token_model::UserToken;

#[derive(Default)]
pub struct InMemoryTokenRepository {
    rows: Mutex<Vec<UserToken>>,
    deleted: Mutex<Vec<String>>,
}

impl InMemoryTokenRepository {
    pub fn with_tokens(tokens: Vec<UserToken>) -> Self {
        let repo = InMemoryTokenRepository::default();
        {
            let mut rows = repo.rows.lock().unwrap();
            for (i, mut t) in tokens.into_iter().enumerate() {
                t.id = Some(i as i64 + 1);
                rows.push(t);
            }
        }
        repo
    }

    pub fn tokens(&self) -> Vec<UserToken> {
        self.rows.lock().unwrap().clone()
    }

    /// Tokens pasados a `delete_by_token`, en orden.
    pub fn deleted_tokens(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn exists_by_token(&self, token: &str) -> Result<bool> {
        Ok(self.rows.lock().unwrap().iter().any(|t| t.token == token))
    }

    async fn find_by_user_id(&self, user_id: &str) -> Result<Vec<UserToken>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn save(&self, mut token: UserToken) -> Result<Option<UserToken>> {
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|t| t.token == token.token) {
            return Ok(None);
        }
        token.id = Some(rows.len() as i64 + 1);
        rows.push(token.clone());
        Ok(Some(token))
    }

    async fn delete_by_token(&self, token: &str) -> Result<u64> {
        self.deleted.lock().unwrap().push(token.to_string());
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|t| t.token != token);
        Ok((before - rows.len()) as u64)
    }

    async fn delete_by_time_before(&self, cutoff: DateTime<Utc>) -> Result<u64> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|t| t.time >= cutoff);
        Ok((before - rows.len()) as u64)
    }
}
