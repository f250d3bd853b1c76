//! JSON rule decks.
//!
//! A deck is the on-disk form of a [`RuleTable`]. Values are in length units;
//! `lambda` only controls how thresholds are phrased in messages.
//!
//! ```json
//! { "lambda": 20,
//!   "min_width":     { "metal1": 40, "contact": 20 },
//!   "min_spacing":   { "metal1": 40 },
//!   "min_enclosure": { "contact": { "metal1": 20 } } }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use maskcheck_core::Layer;

use crate::rules::{RuleError, RuleTable};

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid rule deck: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Rules(#[from] RuleError),
}

fn default_lambda() -> f64 {
    1.0
}

/// Serializable description of a rule table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDeck {
    #[serde(default = "default_lambda")]
    pub lambda: f64,
    #[serde(default)]
    pub min_width: BTreeMap<Layer, f64>,
    #[serde(default)]
    pub min_spacing: BTreeMap<Layer, f64>,
    #[serde(default)]
    pub min_enclosure: BTreeMap<Layer, BTreeMap<Layer, f64>>,
}

impl Default for RuleDeck {
    fn default() -> Self {
        Self {
            lambda: default_lambda(),
            min_width: BTreeMap::new(),
            min_spacing: BTreeMap::new(),
            min_enclosure: BTreeMap::new(),
        }
    }
}

impl RuleDeck {
    pub fn from_json(json: &str) -> Result<Self, DeckError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DeckError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let deck = Self::from_json(&json)?;
        log::info!(
            "Loaded rule deck {}: {} width, {} spacing, {} enclosure rules",
            path.display(),
            deck.min_width.len(),
            deck.min_spacing.len(),
            deck.min_enclosure.values().map(BTreeMap::len).sum::<usize>(),
        );
        Ok(deck)
    }

    pub fn to_json(&self) -> Result<String, DeckError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate and convert into an immutable rule table.
    pub fn into_rules(self) -> Result<RuleTable, DeckError> {
        RuleTable::try_from(self)
    }
}

impl TryFrom<RuleDeck> for RuleTable {
    type Error = DeckError;

    fn try_from(deck: RuleDeck) -> Result<Self, Self::Error> {
        let mut builder = RuleTable::builder().lambda(deck.lambda);
        for (layer, value) in deck.min_width {
            builder = builder.min_width(layer, value);
        }
        for (layer, value) in deck.min_spacing {
            builder = builder.min_spacing(layer, value);
        }
        for (enclosed, margins) in deck.min_enclosure {
            for (enclosing, value) in margins {
                builder = builder.min_enclosure(enclosed, enclosing, value);
            }
        }
        Ok(builder.build()?)
    }
}

impl From<&RuleTable> for RuleDeck {
    fn from(rules: &RuleTable) -> Self {
        Self {
            lambda: rules.lambda(),
            min_width: rules.width_rules().clone(),
            min_spacing: rules.spacing_rules().clone(),
            min_enclosure: rules.enclosure_rules().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_deck() {
        let deck = RuleDeck::from_json(
            r#"{
                "lambda": 20,
                "min_width": { "metal1": 40, "contact": 20 },
                "min_spacing": { "poly": 40 },
                "min_enclosure": { "contact": { "metal1": 20, "poly": 20 } }
            }"#,
        )
        .unwrap();
        let rules = deck.into_rules().unwrap();
        assert_eq!(rules.lambda(), 20.0);
        assert_eq!(rules.min_width(Layer::Metal1), Some(40.0));
        assert_eq!(rules.min_spacing(Layer::Poly), Some(40.0));
        assert_eq!(rules.min_spacing(Layer::Metal1), None);
        assert_eq!(rules.min_enclosure(Layer::Contact, Layer::Poly), Some(20.0));
    }

    #[test]
    fn test_empty_deck_defaults() {
        let rules = RuleDeck::from_json("{}").unwrap().into_rules().unwrap();
        assert_eq!(rules.lambda(), 1.0);
        assert!(Layer::ALL.iter().all(|l| rules.min_width(*l).is_none()));
    }

    #[test]
    fn test_unknown_layer_rejected() {
        let err = RuleDeck::from_json(r#"{ "min_width": { "metal9": 4 } }"#).unwrap_err();
        assert!(matches!(err, DeckError::Json(_)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = RuleDeck::from_json(r#"{ "max_width": {} }"#).unwrap_err();
        assert!(matches!(err, DeckError::Json(_)));
    }

    #[test]
    fn test_negative_value_rejected() {
        let err = RuleDeck::from_json(r#"{ "min_spacing": { "well": -1 } }"#)
            .unwrap()
            .into_rules()
            .unwrap_err();
        assert!(matches!(
            err,
            DeckError::Rules(RuleError::InvalidValue {
                rule: "min_spacing",
                layer: Layer::Well,
                ..
            })
        ));
    }

    #[test]
    fn test_bad_lambda_rejected() {
        let err = RuleDeck::from_json(r#"{ "lambda": 0 }"#)
            .unwrap()
            .into_rules()
            .unwrap_err();
        assert!(matches!(err, DeckError::Rules(RuleError::InvalidLambda(_))));
    }

    #[test]
    fn test_self_enclosure_rejected() {
        let err = RuleDeck::from_json(r#"{ "min_enclosure": { "contact": { "contact": 1 } } }"#)
            .unwrap()
            .into_rules()
            .unwrap_err();
        assert!(matches!(
            err,
            DeckError::Rules(RuleError::SelfEnclosure(Layer::Contact))
        ));
    }

    #[test]
    fn test_deck_from_rules_reloads_identically() {
        let rules = RuleTable::lambda_default(20.0).unwrap();
        let json = RuleDeck::from(&rules).to_json().unwrap();
        let reloaded = RuleDeck::from_json(&json).unwrap().into_rules().unwrap();
        assert_eq!(reloaded, rules);
    }

    #[test]
    fn test_missing_file() {
        let err = RuleDeck::from_path("/nonexistent/maskcheck/deck.json").unwrap_err();
        assert!(matches!(err, DeckError::Io(_)));
    }
}
