//! Error types for MVT feature encoding.

/// Errors that can occur while turning features into MVT records.
#[non_exhaustive]
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MvtError {
    /// Tag references were requested without a feature.
    #[error("Feature is nil")]
    NilFeature,

    /// The geometry is not one of the kinds the MVT command grammar can express.
    #[error("Unsupported geometry kind {0}")]
    UnsupportedGeometryKind(&'static str),

    /// A tag value is not one of the scalar kinds an MVT value can hold.
    #[error("Unsupported value {value} for key {key}")]
    UnsupportedTagValueKind {
        /// Key the value was attached to, empty when the value was converted on its own
        key: String,
        /// Rendered offending value
        value: String,
    },

    /// A tag key is missing from the layer key dictionary.
    #[error("Did not find key {0} in the key dictionary")]
    KeyNotFound(String),

    /// A tag value is missing from the layer value dictionary.
    #[error("Did not find value {value} of key {key} in the value dictionary")]
    ValueNotFound {
        /// Key the value was attached to
        key: String,
        /// Rendered missing value
        value: String,
    },

    /// A drawing command was asked to repeat more times than the 29-bit count field allows.
    #[error("Command count {0} exceeds the maximum of {max}", max = crate::commands::MAX_COMMAND_COUNT)]
    CommandCountOverflow(usize),

    /// An encoded tag sequence does not point into the dictionaries it is resolved against.
    #[error("Tag index {index} at position {position} is invalid")]
    InvalidTagIndex {
        /// Position inside the index-pair sequence
        position: usize,
        /// Offending index, or the dangling trailing value when the sequence length is odd
        index: u32,
    },
}

/// A convenience [`Result`] for MVT encoding.
pub type MvtResult<T> = Result<T, MvtError>;
