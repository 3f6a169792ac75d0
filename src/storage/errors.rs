// ============================================================================
// Storage Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on slot '{slot}': {source}")]
    Io {
        slot: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize slot '{slot}': {source}")]
    Serialization {
        slot: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn io(slot: &str, source: std::io::Error) -> Self {
        Self::Io {
            slot: slot.to_string(),
            source,
        }
    }
}
