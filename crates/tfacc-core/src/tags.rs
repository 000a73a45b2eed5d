// crates/tfacc-core/src/tags.rs
// ============================================================================
// Module: Resource Tags
// Description: Key/value tag sets returned by resource tagging APIs.
// Purpose: Compare user tags without provider-reserved keys.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Tag listings from the cloud API mix user tags with provider-reserved keys
//! (prefixed `aws:`). [`KeyValueTags::ignore_aws`] strips the reserved keys so
//! checks only see tags the configuration controls.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Key prefix reserved by the provider.
pub const RESERVED_TAG_PREFIX: &str = "aws:";

// ============================================================================
// SECTION: Tags
// ============================================================================

/// Ordered key/value tag set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyValueTags(BTreeMap<String, String>);

impl KeyValueTags {
    /// Creates an empty tag set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Inserts or replaces a tag, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns a copy without provider-reserved keys.
    #[must_use]
    pub fn ignore_aws(&self) -> Self {
        Self(
            self.0
                .iter()
                .filter(|(key, _)| !key.starts_with(RESERVED_TAG_PREFIX))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )
    }

    /// Returns the number of tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no tags are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over tags in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Returns the tags as a map.
    #[must_use]
    pub const fn as_map(&self) -> &BTreeMap<String, String> {
        &self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeyValueTags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
    }
}
