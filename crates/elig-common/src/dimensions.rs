//! Dimension schema and immutable dimension sets.
//!
//! A dimension set addresses historical observations at varying specificity.
//! Sets are comparable by specificity: one set is more specific than another
//! when its populated dimensions are a superset of the other's. The schema is
//! fixed at six dimensions; the drop order used by the waterfall lookup is
//! part of this module so every caller steps down levels the same way.

use crate::error::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The six case attributes used to bucket historical observations.
///
/// Enum order is the schema order (most informative first); it also drives
/// `BTreeMap` iteration, which keeps canonical keys deterministic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    ProductType,
    ContractStatus,
    EventTense,
    PayerId,
    Sex,
    AgeBucket,
}

impl Dimension {
    /// All dimensions in schema order.
    pub const ALL: [Dimension; 6] = [
        Dimension::ProductType,
        Dimension::ContractStatus,
        Dimension::EventTense,
        Dimension::PayerId,
        Dimension::Sex,
        Dimension::AgeBucket,
    ];

    /// Waterfall drop order: least-informative dimension first.
    ///
    /// Stepping down one specificity level removes the next dimension in
    /// this sequence from the filter.
    pub const DROP_ORDER: [Dimension; 6] = [
        Dimension::AgeBucket,
        Dimension::Sex,
        Dimension::PayerId,
        Dimension::EventTense,
        Dimension::ContractStatus,
        Dimension::ProductType,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::ProductType => "product_type",
            Dimension::ContractStatus => "contract_status",
            Dimension::EventTense => "event_tense",
            Dimension::PayerId => "payer_id",
            Dimension::Sex => "sex",
            Dimension::AgeBucket => "age_bucket",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable set of populated dimension values.
///
/// Construct with [`DimensionSet::from_pairs`] or [`DimensionSet::empty`];
/// there is no mutation API. Backed by a `BTreeMap` so iteration order, and
/// therefore the canonical key, is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct DimensionSet {
    values: BTreeMap<Dimension, String>,
}

impl DimensionSet {
    /// The empty set: matches every observation (global average).
    pub fn empty() -> Self {
        DimensionSet {
            values: BTreeMap::new(),
        }
    }

    /// Build a set from (dimension, value) pairs.
    ///
    /// Rejects blank values and duplicate dimensions.
    pub fn from_pairs<I, V>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (Dimension, V)>,
        V: Into<String>,
    {
        let mut values = BTreeMap::new();
        for (dimension, value) in pairs {
            let value = value.into();
            if value.trim().is_empty() {
                return Err(Error::InvalidDimension {
                    dimension: dimension.to_string(),
                    message: "value must not be blank".to_string(),
                });
            }
            if values.insert(dimension, value).is_some() {
                return Err(Error::InvalidDimension {
                    dimension: dimension.to_string(),
                    message: "dimension populated more than once".to_string(),
                });
            }
        }
        Ok(DimensionSet { values })
    }

    /// Value for a dimension, if populated.
    pub fn get(&self, dimension: Dimension) -> Option<&str> {
        self.values.get(&dimension).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Populated dimensions in schema order.
    pub fn populated(&self) -> Vec<Dimension> {
        Dimension::ALL
            .iter()
            .copied()
            .filter(|d| self.values.contains_key(d))
            .collect()
    }

    /// A new set keeping only the listed dimensions (where populated).
    pub fn project(&self, keep: &[Dimension]) -> DimensionSet {
        let values = self
            .values
            .iter()
            .filter(|(d, _)| keep.contains(d))
            .map(|(d, v)| (*d, v.clone()))
            .collect();
        DimensionSet { values }
    }

    /// True if every dimension populated in `other` is populated here with
    /// the same value. Specificity comparison for the waterfall.
    pub fn is_superset_of(&self, other: &DimensionSet) -> bool {
        other
            .values
            .iter()
            .all(|(d, v)| self.values.get(d) == Some(v))
    }

    /// Stable string form used as a store filter key and in logs.
    ///
    /// `dimension=value` pairs joined with `|` in schema order; the empty
    /// set renders as `*`.
    pub fn canonical_key(&self) -> String {
        if self.values.is_empty() {
            return "*".to_string();
        }
        self.values
            .iter()
            .map(|(d, v)| format!("{}={}", d, v))
            .collect::<Vec<_>>()
            .join("|")
    }

    /// Re-check the blank-value rule on a set that arrived via
    /// deserialization, which bypasses `from_pairs`.
    pub fn validate(&self) -> Result<(), Error> {
        for (dimension, value) in &self.values {
            if value.trim().is_empty() {
                return Err(Error::InvalidDimension {
                    dimension: dimension.to_string(),
                    message: "value must not be blank".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_set() -> DimensionSet {
        DimensionSet::from_pairs([
            (Dimension::ProductType, "ppo"),
            (Dimension::PayerId, "payer-001"),
            (Dimension::AgeBucket, "50-59"),
        ])
        .unwrap()
    }

    #[test]
    fn test_from_pairs_rejects_blank_value() {
        let err = DimensionSet::from_pairs([(Dimension::Sex, "  ")]).unwrap_err();
        match err {
            Error::InvalidDimension { dimension, .. } => assert_eq!(dimension, "sex"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_from_pairs_rejects_duplicate_dimension() {
        let result = DimensionSet::from_pairs([
            (Dimension::PayerId, "a"),
            (Dimension::PayerId, "b"),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_canonical_key_is_schema_ordered() {
        // Insertion order differs from schema order; key must not.
        let set = DimensionSet::from_pairs([
            (Dimension::AgeBucket, "50-59"),
            (Dimension::ProductType, "ppo"),
            (Dimension::PayerId, "payer-001"),
        ])
        .unwrap();
        assert_eq!(
            set.canonical_key(),
            "product_type=ppo|payer_id=payer-001|age_bucket=50-59"
        );
    }

    #[test]
    fn test_canonical_key_empty_is_star() {
        assert_eq!(DimensionSet::empty().canonical_key(), "*");
    }

    #[test]
    fn test_project_keeps_only_listed() {
        let set = sample_set();
        let projected = set.project(&[Dimension::ProductType, Dimension::Sex]);
        assert_eq!(projected.len(), 1);
        assert_eq!(projected.get(Dimension::ProductType), Some("ppo"));
        assert_eq!(projected.get(Dimension::Sex), None);
    }

    #[test]
    fn test_superset_comparison() {
        let set = sample_set();
        let coarser = set.project(&[Dimension::ProductType, Dimension::PayerId]);
        assert!(set.is_superset_of(&coarser));
        assert!(!coarser.is_superset_of(&set));
        assert!(set.is_superset_of(&DimensionSet::empty()));
    }

    #[test]
    fn test_superset_requires_equal_values() {
        let set = sample_set();
        let other = DimensionSet::from_pairs([(Dimension::ProductType, "hmo")]).unwrap();
        assert!(!set.is_superset_of(&other));
    }

    #[test]
    fn test_populated_in_schema_order() {
        let set = sample_set();
        assert_eq!(
            set.populated(),
            vec![Dimension::ProductType, Dimension::PayerId, Dimension::AgeBucket]
        );
    }

    #[test]
    fn test_serde_roundtrip() {
        let set = sample_set();
        let json = serde_json::to_string(&set).unwrap();
        let back: DimensionSet = serde_json::from_str(&json).unwrap();
        assert_eq!(set, back);
    }

    #[test]
    fn test_validate_flags_blank_after_deserialize() {
        let set: DimensionSet = serde_json::from_str(r#"{"sex": ""}"#).unwrap();
        assert!(set.validate().is_err());
    }

    #[test]
    fn test_drop_order_covers_schema() {
        let mut dropped: Vec<Dimension> = Dimension::DROP_ORDER.to_vec();
        dropped.sort();
        let mut all: Vec<Dimension> = Dimension::ALL.to_vec();
        all.sort();
        assert_eq!(dropped, all);
    }
}
