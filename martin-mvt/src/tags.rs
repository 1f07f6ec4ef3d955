use std::collections::HashMap;

use geozero::mvt::tile::Value;
use tracing::debug;

use crate::{Feature, MvtError, MvtResult, TagValue};

/// Layer-wide key and value dictionaries referenced by feature tags.
///
/// Both lists keep first-seen order and hold no duplicates. Values are
/// deduplicated per kind, see [`TagValue`].
#[derive(Debug, Default, Clone)]
pub struct TagDictionary {
    keys: Vec<String>,
    values: Vec<TagValue>,
    key_index: HashMap<String, u32>,
    value_index: HashMap<TagValue, u32>,
}

impl TagDictionary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the tags of every feature, in feature order.
    #[must_use]
    pub fn build(features: &[Feature]) -> Self {
        let mut dict = Self::new();
        for feature in features {
            for (key, value) in &feature.tags {
                dict.insert(key, value);
            }
        }
        debug!(
            "Built tag dictionary from {} features: {} keys, {} values",
            features.len(),
            dict.keys.len(),
            dict.values.len()
        );
        dict
    }

    /// Adds a key and a value if they are not known yet, returning their indexes.
    pub fn insert(&mut self, key: &str, value: &TagValue) -> (u32, u32) {
        let key_idx = match self.key_index.get(key) {
            Some(idx) => *idx,
            None => {
                let idx = next_index(self.keys.len());
                self.keys.push(key.to_string());
                self.key_index.insert(key.to_string(), idx);
                idx
            }
        };
        let value_idx = match self.value_index.get(value) {
            Some(idx) => *idx,
            None => {
                let idx = next_index(self.values.len());
                self.values.push(value.clone());
                self.value_index.insert(value.clone(), idx);
                idx
            }
        };
        (key_idx, value_idx)
    }

    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    #[must_use]
    pub fn values(&self) -> &[TagValue] {
        &self.values
    }

    /// Returns the `[key, value, key, value, ...]` index sequence of a feature.
    ///
    /// Fails if a key or value is missing, which means the dictionaries were not
    /// built from a set of features containing this one.
    pub fn encode_tags(&self, feature: Option<&Feature>) -> MvtResult<Vec<u32>> {
        let feature = feature.ok_or(MvtError::NilFeature)?;
        let mut tags = Vec::with_capacity(feature.tags.len() * 2);
        for (key, value) in &feature.tags {
            let key_idx = self
                .key_index
                .get(key)
                .ok_or_else(|| MvtError::KeyNotFound(key.clone()))?;
            let value_idx =
                self.value_index
                    .get(value)
                    .ok_or_else(|| MvtError::ValueNotFound {
                        key: key.clone(),
                        value: value.to_string(),
                    })?;
            tags.push(*key_idx);
            tags.push(*value_idx);
        }
        Ok(tags)
    }

    /// Dereferences an index sequence produced by [`TagDictionary::encode_tags`].
    pub fn resolve(&self, tags: &[u32]) -> MvtResult<Vec<(&str, &TagValue)>> {
        let (pairs, rest) = tags.as_chunks::<2>();
        if !rest.is_empty() {
            return Err(MvtError::InvalidTagIndex {
                position: tags.len() - 1,
                index: rest[0],
            });
        }
        pairs
            .iter()
            .enumerate()
            .map(|(pos, [k, v])| {
                let key = self.keys.get(*k as usize).ok_or(MvtError::InvalidTagIndex {
                    position: pos * 2,
                    index: *k,
                })?;
                let value = self.values.get(*v as usize).ok_or(MvtError::InvalidTagIndex {
                    position: pos * 2 + 1,
                    index: *v,
                })?;
                Ok((key.as_str(), value))
            })
            .collect()
    }

    /// Consumes the dictionaries, returning the keys and the protobuf values of a layer.
    #[must_use]
    pub fn into_parts(self) -> (Vec<String>, Vec<Value>) {
        (
            self.keys,
            self.values.into_iter().map(Value::from).collect(),
        )
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "a layer never holds more than u32::MAX distinct tags"
)]
fn next_index(len: usize) -> u32 {
    len as u32
}

#[cfg(test)]
mod tests {
    use geo_types::Point;
    use pretty_assertions::assert_eq;

    use super::TagValue::{Bool, Display, F32, F64, I8, I16, I32, I64, U8, U64};
    use super::*;
    use crate::Tags;

    fn s(s: &str) -> String {
        s.to_string()
    }

    fn feature(tags: &[(&str, TagValue)]) -> Feature {
        let tags: Tags = tags.iter().map(|(k, v)| (s(k), v.clone())).collect();
        Feature::from_geometry(Some(Point::new(0., 0.).into()), tags).remove(0)
    }

    #[test]
    fn test_add_value() {
        let mut dict = TagDictionary::new();
        assert_eq!((0, 0), dict.insert("foo", &TagValue::from("bar")));
        assert_eq!((0, 1), dict.insert("foo", &TagValue::from("baz")));
        assert_eq!((0, 2), dict.insert("foo", &I64(42)));
        assert_eq!((1, 2), dict.insert("bar", &I64(42)));
        assert_eq!((1, 3), dict.insert("bar", &I32(42)));

        let (keys, values) = dict.into_parts();
        assert_eq!(vec![s("foo"), s("bar")], keys);
        assert_eq!(values.len(), 4);
        assert_eq!(values[0].string_value, Some(s("bar")));
        assert_eq!(values[3].int_value, Some(42));
    }

    #[test]
    fn test_build_dedups_across_features() {
        let features = [
            feature(&[("class", TagValue::from("road")), ("lanes", U8(2))]),
            feature(&[("class", TagValue::from("road")), ("oneway", Bool(true))]),
            feature(&[("class", Display(s("road"))), ("lanes", U8(2))]),
        ];
        let dict = TagDictionary::build(&features);
        assert_eq!(dict.keys(), &[s("class"), s("lanes"), s("oneway")]);
        assert_eq!(
            dict.values(),
            &[TagValue::from("road"), U8(2), Bool(true), Display(s("road"))]
        );

        assert_eq!(dict.encode_tags(Some(&features[0])), Ok(vec![0, 0, 1, 1]));
        assert_eq!(dict.encode_tags(Some(&features[1])), Ok(vec![0, 0, 2, 2]));
        assert_eq!(dict.encode_tags(Some(&features[2])), Ok(vec![0, 3, 1, 1]));
    }

    #[test]
    fn test_round_trip() {
        let features = [
            feature(&[("a", F64(1.5)), ("b", I16(-4)), ("c", U64(u64::MAX))]),
            feature(&[("a", F32(1.5)), ("d", TagValue::from("x"))]),
        ];
        let dict = TagDictionary::build(&features);
        for f in &features {
            let encoded = dict.encode_tags(Some(f)).unwrap();
            let resolved = dict.resolve(&encoded).unwrap();
            let expected: Vec<_> = f.tags.iter().map(|(k, v)| (k.as_str(), v)).collect();
            assert_eq!(resolved, expected);
        }
    }

    #[test]
    fn test_rebuild_is_stable() {
        let features = [
            feature(&[("z", I8(1)), ("a", I8(2))]),
            feature(&[("m", Bool(false))]),
        ];
        let first = TagDictionary::build(&features);
        let second = TagDictionary::build(&features);
        assert_eq!(first.keys(), second.keys());
        assert_eq!(first.values(), second.values());
        assert_eq!(first.keys(), &[s("a"), s("z"), s("m")]);
    }

    #[test]
    fn test_nil_feature() {
        let dict = TagDictionary::new();
        assert_eq!(dict.encode_tags(None), Err(MvtError::NilFeature));
    }

    #[test]
    fn test_key_not_found() {
        let dict = TagDictionary::build(&[feature(&[("a", I8(1))])]);
        let other = feature(&[("b", I8(1))]);
        assert_eq!(
            dict.encode_tags(Some(&other)),
            Err(MvtError::KeyNotFound(s("b")))
        );
    }

    #[test]
    fn test_value_not_found_is_kind_aware() {
        let dict = TagDictionary::build(&[feature(&[("a", I8(1))])]);
        let other = feature(&[("a", I16(1))]);
        assert_eq!(
            dict.encode_tags(Some(&other)),
            Err(MvtError::ValueNotFound {
                key: s("a"),
                value: s("1i16"),
            })
        );
    }

    #[test]
    fn test_resolve_rejects_bad_indexes() {
        let dict = TagDictionary::build(&[feature(&[("a", I8(1))])]);
        assert_eq!(
            dict.resolve(&[0, 0, 7]),
            Err(MvtError::InvalidTagIndex {
                position: 2,
                index: 7
            })
        );
        assert_eq!(
            dict.resolve(&[0, 5]),
            Err(MvtError::InvalidTagIndex {
                position: 1,
                index: 5
            })
        );
    }
}
