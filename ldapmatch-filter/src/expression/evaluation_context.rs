// Copyright 2025 The LdapMatch Rust Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashMap;

use ahash::RandomState;
use cheetah_string::CheetahString;
use ldapmatch_error::FilterError;
use ldapmatch_error::FilterResult;

use crate::expression::property_value::PropertyValue;

/// Property lookup capability consumed by filter evaluation.
///
/// The only operation evaluation needs is `get`; whether the lookup is
/// case sensitive is a property of the implementing context, decided when
/// the context is built.
pub trait EvaluationContext {
    /// Get the property stored under `name`, or `None` if absent.
    fn get(&self, name: &str) -> Option<&PropertyValue>;
}

/// Case-sensitive property set.
///
/// Stores the properties a filter is matched against, keyed exactly as
/// supplied. Typically filled once and then used read-only by any number
/// of [`crate::Filter::matches`] calls.
///
/// # Example
///
/// ```
/// use ldapmatch_filter::Properties;
///
/// let mut props = Properties::new();
/// props.put("cn", "Babs Jensen");
/// props.put("age", 33i32);
/// ```
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Properties {
    #[serde(with = "hashmap_serde")]
    properties: HashMap<CheetahString, PropertyValue, RandomState>,
}

// Custom serde implementation for HashMap with RandomState
mod hashmap_serde {
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serialize;
    use serde::Serializer;

    use super::*;

    pub fn serialize<S>(
        map: &HashMap<CheetahString, PropertyValue, RandomState>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let standard_map: HashMap<&CheetahString, &PropertyValue> = map.iter().collect();
        standard_map.serialize(serializer)
    }

    pub fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<HashMap<CheetahString, PropertyValue, RandomState>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let standard_map: HashMap<CheetahString, PropertyValue> = HashMap::deserialize(deserializer)?;
        let mut ahash_map = HashMap::with_hasher(RandomState::default());
        ahash_map.extend(standard_map);
        Ok(ahash_map)
    }
}

impl Properties {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            properties: HashMap::with_capacity_and_hasher(capacity, RandomState::default()),
        }
    }

    /// Sets a property, replacing and returning any previous value stored
    /// under the same key.
    #[inline]
    pub fn put(
        &mut self,
        key: impl Into<CheetahString>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        self.properties.insert(key.into(), value.into())
    }

    #[inline]
    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        self.properties.remove(key)
    }

    #[inline]
    pub fn contains_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&CheetahString, &PropertyValue)> {
        self.properties.iter()
    }

    #[inline]
    pub fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (CheetahString, PropertyValue)>,
    {
        self.properties.extend(iter);
    }
}

impl EvaluationContext for Properties {
    #[inline]
    fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}

impl FromIterator<(CheetahString, PropertyValue)> for Properties {
    fn from_iter<I: IntoIterator<Item = (CheetahString, PropertyValue)>>(iter: I) -> Self {
        let mut properties = Properties::new();
        properties.extend(iter);
        properties
    }
}

/// Property set with case-insensitive key lookup.
///
/// Attribute names are folded once at construction time. A source
/// containing two keys that differ only by case has no well-defined
/// folded form, so construction fails eagerly with
/// [`FilterError::AmbiguousKey`] rather than leaving the ambiguity to
/// surface during evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseInsensitiveProperties {
    folded: HashMap<CheetahString, PropertyValue, RandomState>,
}

impl CaseInsensitiveProperties {
    /// Builds the folded lookup table from a case-sensitive property set.
    pub fn new(source: Properties) -> FilterResult<Self> {
        let mut folded = HashMap::with_capacity_and_hasher(source.len(), RandomState::default());
        for (key, value) in source.properties {
            let folded_key = CheetahString::from(key.to_lowercase());
            if folded.insert(folded_key, value).is_some() {
                return Err(FilterError::ambiguous_key(key.as_str()));
            }
        }
        Ok(Self { folded })
    }
}

impl EvaluationContext for CaseInsensitiveProperties {
    fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.folded.get(name.to_lowercase().as_str())
    }
}

impl TryFrom<Properties> for CaseInsensitiveProperties {
    type Error = FilterError;

    fn try_from(source: Properties) -> Result<Self, Self::Error> {
        CaseInsensitiveProperties::new(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_and_get() {
        let mut props = Properties::new();
        props.put("key1", "value1");
        props.put("key2", 42i32);

        assert_eq!(props.get("key1"), Some(&PropertyValue::Str("value1".into())));
        assert_eq!(props.get("key2"), Some(&PropertyValue::Int(42)));
        assert_eq!(props.get("nonexistent"), None);
        assert_eq!(props.len(), 2);
    }

    #[test]
    fn test_put_overwrites_existing() {
        let mut props = Properties::new();
        props.put("key", "old");
        let previous = props.put("key", "new");

        assert_eq!(previous, Some(PropertyValue::Str("old".into())));
        assert_eq!(props.get("key"), Some(&PropertyValue::Str("new".into())));
        assert_eq!(props.len(), 1);
    }

    #[test]
    fn test_get_is_case_sensitive() {
        let mut props = Properties::new();
        props.put("cn", "a");

        assert!(props.get("cn").is_some());
        assert!(props.get("CN").is_none());
    }

    #[test]
    fn test_remove() {
        let mut props = Properties::new();
        props.put("key", "value");

        let removed = props.remove("key");
        assert_eq!(removed, Some(PropertyValue::Str("value".into())));
        assert!(props.is_empty());
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let mut props = Properties::new();
        props.put("ObjectClass", "Person");
        let ci = CaseInsensitiveProperties::new(props).unwrap();

        assert!(ci.get("objectclass").is_some());
        assert!(ci.get("OBJECTCLASS").is_some());
        assert!(ci.get("ObjectClass").is_some());
        assert!(ci.get("cn").is_none());
    }

    #[test]
    fn test_case_variant_keys_are_rejected_eagerly() {
        let mut props = Properties::new();
        props.put("cn", "a");
        props.put("CN", "b");

        let err = CaseInsensitiveProperties::new(props).unwrap_err();
        assert!(matches!(err, FilterError::AmbiguousKey { .. }));
    }

    #[test]
    fn test_serde_serialize_deserialize() {
        let mut props = Properties::new();
        props.put("name", "babs");
        props.put("age", 33i32);
        props.put("tags", vec!["a", "b"]);

        let json = serde_json::to_string(&props).unwrap();
        let back: Properties = serde_json::from_str(&json).unwrap();
        assert_eq!(props, back);
    }

    #[test]
    fn test_evaluation_context_trait_object() {
        let mut props = Properties::new();
        props.put("key", "value");

        let ctx: &dyn EvaluationContext = &props;
        assert!(ctx.get("key").is_some());
        assert!(ctx.get("other").is_none());
    }
}
