use std::collections::BTreeMap;
use std::fmt;

use geo_types::Geometry;
use geozero::mvt::tile::{self, GeomType};
use tracing::trace;

use crate::geometry::{encode_geometry, geometry_kind};
use crate::{Extent, MvtError, MvtResult, TagDictionary, TagValue};

/// Tags of a feature, iterated in key order.
pub type Tags = BTreeMap<String, TagValue>;

/// Converts a JSON property map into [`Tags`], rejecting any non-scalar value.
pub fn tags_from_json(properties: serde_json::Map<String, serde_json::Value>) -> MvtResult<Tags> {
    properties
        .into_iter()
        .map(|(key, value)| match TagValue::try_from(value) {
            Ok(value) => Ok((key, value)),
            Err(MvtError::UnsupportedTagValueKind { value, .. }) => {
                Err(MvtError::UnsupportedTagValueKind { key, value })
            }
            Err(e) => Err(e),
        })
        .collect()
}

/// A single geometry with its tags, ready to be encoded into a layer.
///
/// The geometry is never a collection: [`Feature::from_geometry`] splits
/// collections into one feature per member.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<u64>,
    pub tags: Tags,
    geometry: Geometry,
}

impl Feature {
    /// Returns one feature per non-collection geometry found in `geometry`,
    /// each carrying a copy of `tags`. Nested collections are expanded recursively,
    /// and a missing geometry yields no features.
    #[must_use]
    pub fn from_geometry(geometry: Option<Geometry>, tags: Tags) -> Vec<Self> {
        let mut features = Vec::new();
        if let Some(geometry) = geometry {
            flatten_into(geometry, &tags, &mut features);
        }
        features
    }

    /// Same as [`Feature::from_geometry`], with tags given as JSON properties.
    pub fn from_json(
        geometry: Option<Geometry>,
        properties: serde_json::Map<String, serde_json::Value>,
    ) -> MvtResult<Vec<Self>> {
        Ok(Self::from_geometry(geometry, tags_from_json(properties)?))
    }

    #[must_use]
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Encodes the feature against the layer-wide dictionaries.
    ///
    /// The dictionaries must have been built from a set of features including this one.
    pub fn to_tile_feature(&self, dict: &TagDictionary, extent: &Extent) -> MvtResult<TileFeature> {
        let tags = dict.encode_tags(Some(self))?;
        let (geometry, geom_type) = encode_geometry(&self.geometry, extent)?;
        Ok(TileFeature {
            id: self.id,
            tags,
            geom_type,
            geometry,
        })
    }
}

fn flatten_into(geometry: Geometry, tags: &Tags, features: &mut Vec<Feature>) {
    match geometry {
        Geometry::GeometryCollection(collection) => {
            trace!("Flattening collection of {} geometries", collection.0.len());
            for child in collection {
                flatten_into(child, tags, features);
            }
        }
        geometry => features.push(Feature {
            id: None,
            tags: tags.clone(),
            geometry,
        }),
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = geometry_kind(&self.geometry);
        let tags = self
            .tags
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", ");
        match self.id {
            Some(id) => write!(f, "{{Feature: {id}, GEO: {kind}, Tags: {{{tags}}}}}"),
            None => write!(f, "{{Feature: GEO: {kind}, Tags: {{{tags}}}}}"),
        }
    }
}

/// An encoded feature: index pairs into the layer dictionaries and a geometry command stream.
#[derive(Debug, Clone, PartialEq)]
pub struct TileFeature {
    pub id: Option<u64>,
    pub tags: Vec<u32>,
    pub geom_type: GeomType,
    pub geometry: Vec<u32>,
}

impl From<TileFeature> for tile::Feature {
    fn from(feature: TileFeature) -> Self {
        Self {
            id: feature.id,
            tags: feature.tags,
            r#type: Some(feature.geom_type as i32),
            geometry: feature.geometry,
        }
    }
}
