//! models/message_model.rs

use serde::{Deserialize, Serialize};

/// Petición de envío de una notificación a todos los dispositivos de un usuario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    #[serde(default, deserialize_with = "super::null_as_blank")]
    pub user_id: String,
    #[serde(default, deserialize_with = "super::null_as_blank")]
    pub message_title: String,
    #[serde(default, deserialize_with = "super::null_as_blank")]
    pub message_text: String,
}

impl MessageDto {
    pub fn validate(&self) -> Vec<String> {
        [
            ("userId", &self.user_id),
            ("messageTitle", &self.message_title),
            ("messageText", &self.message_text),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| format!("{} may not be blank", field))
        .collect()
    }
}
