use serde::{Deserialize, Serialize};

use crate::Extent;

/// Configuration of one encoded layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// layer name as it appears in the tile
    pub name: String,
    /// geographic bounds of the tile, mapped onto the 4096 grid
    #[serde(default)]
    pub bounds: Extent,
    /// JSON property to use as the feature id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_key: Option<String>,
}

impl LayerConfig {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Extent::default(),
            id_key: None,
        }
    }
}
