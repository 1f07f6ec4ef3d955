use geo_types::Geometry;
use geozero::mvt::tile;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::extent::TILE_EXTENT;
use crate::{
    Extent, Feature, LayerConfig, MvtError, MvtResult, TagDictionary, TileFeature, Tags,
    tags_from_json,
};

/// Outcome of [`LayerBuilder::build`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LayerReport {
    /// Number of features written to the layer
    pub encoded: usize,
    /// Position and error of every feature that could not be encoded
    pub skipped: Vec<(usize, MvtError)>,
}

/// Collects features of a single layer and encodes them together.
#[derive(Debug, Clone)]
pub struct LayerBuilder {
    name: String,
    extent: Extent,
    id_key: Option<String>,
    features: Vec<Feature>,
}

impl LayerBuilder {
    #[must_use]
    pub fn new(name: String, extent: Extent) -> Self {
        Self {
            name,
            extent,
            id_key: None,
            features: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_config(cfg: &LayerConfig) -> Self {
        Self {
            id_key: cfg.id_key.clone(),
            ..Self::new(cfg.name.clone(), cfg.bounds)
        }
    }

    pub fn add_feature(&mut self, feature: Feature) {
        self.features.push(feature);
    }

    /// Adds one feature per non-collection geometry. Returns how many were added.
    pub fn add_geometry(&mut self, geometry: Option<Geometry>, tags: Tags) -> usize {
        let features = Feature::from_geometry(geometry, tags);
        let count = features.len();
        self.features.extend(features);
        count
    }

    /// Adds a feature with JSON properties. If the layer has an `id_key` and
    /// that property is a non-negative integer, it becomes the feature id.
    ///
    /// The id is only applied when the geometry yields a single feature.
    /// Members of a collection get no id.
    pub fn add_json_feature(
        &mut self,
        geometry: Option<Geometry>,
        mut properties: serde_json::Map<String, serde_json::Value>,
    ) -> MvtResult<usize> {
        let id = self.id_key.as_ref().and_then(|key| {
            let id = properties.get(key)?.as_u64()?;
            properties.remove(key);
            Some(id)
        });
        let mut features = Feature::from_geometry(geometry, tags_from_json(properties)?);
        if let (Some(id), [feature]) = (id, features.as_mut_slice()) {
            feature.id = Some(id);
        }
        let count = features.len();
        self.features.extend(features);
        Ok(count)
    }

    #[must_use]
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Builds the dictionaries, then encodes every feature against them.
    ///
    /// Features are encoded in parallel. The result has one entry per feature,
    /// in the order they were added.
    #[must_use]
    pub fn encode_features(&self) -> (TagDictionary, Vec<MvtResult<TileFeature>>) {
        let dict = TagDictionary::build(&self.features);
        let encoded = self
            .features
            .par_iter()
            .map(|f| f.to_tile_feature(&dict, &self.extent))
            .collect();
        (dict, encoded)
    }

    /// Encodes the layer, skipping features that fail to encode.
    #[must_use]
    pub fn build(self) -> (tile::Layer, LayerReport) {
        let (dict, encoded) = self.encode_features();
        let mut report = LayerReport::default();
        let mut features: Vec<tile::Feature> = Vec::with_capacity(encoded.len());
        for (idx, result) in encoded.into_iter().enumerate() {
            match result {
                Ok(feature) => features.push(feature.into()),
                Err(e) => {
                    warn!(
                        "Skipping feature {} of layer {}: {e}",
                        self.features[idx], self.name
                    );
                    report.skipped.push((idx, e));
                }
            }
        }
        report.encoded = features.len();
        debug!(
            "Encoded layer {} with {} features, {} skipped",
            self.name,
            report.encoded,
            report.skipped.len()
        );

        let (keys, values) = dict.into_parts();
        let layer = tile::Layer {
            version: 2,
            name: self.name,
            features,
            keys,
            values,
            extent: Some(TILE_EXTENT),
        };
        (layer, report)
    }
}
