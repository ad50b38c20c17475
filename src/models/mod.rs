//! models/mod.rs
//! Módulo raíz para modelos/estructuras compartidas.

use serde::{Deserialize, Deserializer};

pub mod message_model;
pub mod response_model;
pub mod token_model;

/// Un `null` explícito cuenta como campo vacío, igual que una clave ausente.
pub(crate) fn null_as_blank<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
