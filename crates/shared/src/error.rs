use thiserror::Error;

/// Faults that abort an encode operation. Storage faults never surface here;
/// the cart store absorbs those at its own boundary.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// The configured nominal transfer amount is not a finite decimal
    /// number. Emitting a link anyway would hand the wallet a corrupt
    /// financial payload, so this is fatal and non-retryable.
    #[error("invalid nominal amount in configuration: {raw:?}")]
    InvalidAmount { raw: String },

    #[error("failed to serialize transfer payload: {source}")]
    Serialize {
        #[from]
        source: serde_json::Error,
    },
}
