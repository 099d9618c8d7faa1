/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the core data model.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A slot index lies outside an inventory's capacity.
    #[error("slot {index} is out of range (capacity {capacity})")]
    SlotOutOfRange {
        /// The requested slot.
        index: usize,
        /// The inventory capacity.
        capacity: usize,
    },

    /// A shop price is below zero.
    #[error("price of \"{tag}\" must not be negative (got {price})")]
    NegativePrice {
        /// Tag of the item being offered.
        tag: String,
        /// The rejected price.
        price: i64,
    },

    /// A theme name is not part of the fixed theme set.
    #[error("unknown theme \"{0}\"")]
    UnknownTheme(String),

    /// Two catalog entries or passages share the same key.
    #[error("duplicate {kind} \"{key}\"")]
    Duplicate {
        /// What was duplicated (item, stat, passage name, passage id).
        kind: &'static str,
        /// The duplicated key.
        key: String,
    },

    /// A story file could not be decoded.
    #[error("invalid story file: {0}")]
    InvalidStory(#[from] serde_json::Error),

    /// A story file could not be read.
    #[error("cannot read story file: {0}")]
    Io(#[from] std::io::Error),
}
