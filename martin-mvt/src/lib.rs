#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod commands;

mod config;
pub use config::LayerConfig;

mod cursor;
pub use cursor::Cursor;

mod error;
pub use error::{MvtError, MvtResult};

mod extent;
pub use extent::{Extent, TILE_EXTENT};

mod feature;
pub use feature::{Feature, Tags, TileFeature, tags_from_json};

mod geometry;
pub use geometry::{encode_geometry, geometry_kind};

mod layer;
pub use layer::{LayerBuilder, LayerReport};

mod tag_value;
pub use tag_value::TagValue;

mod tags;
pub use tags::TagDictionary;

/// Protobuf records produced by this crate.
pub use geozero::mvt::tile;
