use thiserror::Error;

use crate::kv::KvError;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content is not valid: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("content could not be serialized: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("content must be a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("content could not be saved: {0}")]
    Persist(#[from] KvError),
}
