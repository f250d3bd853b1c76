use std::collections::BTreeMap;

use thiserror::Error;

use maskcheck_core::Layer;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("Invalid {rule} value {value} for layer {layer}")]
    InvalidValue {
        rule: &'static str,
        layer: Layer,
        value: f64,
    },

    #[error("Lambda must be a positive number, got {0}")]
    InvalidLambda(f64),

    #[error("Layer {0} cannot enclose itself")]
    SelfEnclosure(Layer),
}

/// Immutable per-layer design rules.
///
/// A layer without an entry has no rule in that category: callers skip it
/// rather than treating the threshold as zero. Every stored value is finite
/// and non-negative, and `lambda` is finite and positive.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTable {
    lambda: f64,
    min_width: BTreeMap<Layer, f64>,
    min_spacing: BTreeMap<Layer, f64>,
    /// enclosed layer → enclosing layer → margin
    min_enclosure: BTreeMap<Layer, BTreeMap<Layer, f64>>,
}

impl RuleTable {
    pub fn builder() -> RuleTableBuilder {
        RuleTableBuilder::default()
    }

    /// The classic lambda rule set: 2λ width and spacing on the drawn layers,
    /// 1λ on contacts, and 1λ contact enclosure by both metals, poly and
    /// diffusion. `lambda` is the number of length units per λ.
    pub fn lambda_default(lambda: f64) -> Result<Self, RuleError> {
        let mut builder = Self::builder().lambda(lambda);
        for layer in [Layer::Metal1, Layer::Metal2, Layer::Poly, Layer::Diffusion, Layer::Well] {
            builder = builder
                .min_width(layer, 2.0 * lambda)
                .min_spacing(layer, 2.0 * lambda);
        }
        builder = builder
            .min_width(Layer::Contact, lambda)
            .min_spacing(Layer::Contact, lambda);
        for enclosing in [Layer::Metal1, Layer::Metal2, Layer::Poly, Layer::Diffusion] {
            builder = builder.min_enclosure(Layer::Contact, enclosing, lambda);
        }
        builder.build()
    }

    /// Length units per λ, used only when phrasing messages.
    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    /// Minimum width and height for shapes on `layer`, if a rule exists.
    pub fn min_width(&self, layer: Layer) -> Option<f64> {
        self.min_width.get(&layer).copied()
    }

    /// Minimum gap between two shapes on `layer`, if a rule exists.
    pub fn min_spacing(&self, layer: Layer) -> Option<f64> {
        self.min_spacing.get(&layer).copied()
    }

    /// Margin by which `enclosing` must surround shapes on `enclosed`, if a rule exists.
    pub fn min_enclosure(&self, enclosed: Layer, enclosing: Layer) -> Option<f64> {
        self.min_enclosure
            .get(&enclosed)
            .and_then(|m| m.get(&enclosing))
            .copied()
    }

    /// Layers that must be enclosed by at least one other layer, in layer order.
    pub fn enclosed_layers(&self) -> impl Iterator<Item = Layer> + '_ {
        self.min_enclosure
            .iter()
            .filter(|(_, m)| !m.is_empty())
            .map(|(l, _)| *l)
    }

    /// Enclosing layers and margins configured for `enclosed`, in layer order.
    pub fn enclosing_layers(&self, enclosed: Layer) -> Vec<(Layer, f64)> {
        self.min_enclosure
            .get(&enclosed)
            .map(|m| m.iter().map(|(l, v)| (*l, *v)).collect())
            .unwrap_or_default()
    }

    pub(crate) fn width_rules(&self) -> &BTreeMap<Layer, f64> {
        &self.min_width
    }

    pub(crate) fn spacing_rules(&self) -> &BTreeMap<Layer, f64> {
        &self.min_spacing
    }

    pub(crate) fn enclosure_rules(&self) -> &BTreeMap<Layer, BTreeMap<Layer, f64>> {
        &self.min_enclosure
    }

    /// Express a length in lambda for messages, e.g. `40.0` → `"2λ"` at λ = 20.
    pub fn format_length(&self, value: f64) -> String {
        format!("{}λ", value / self.lambda)
    }
}

fn check_value(rule: &'static str, layer: Layer, value: f64) -> Result<(), RuleError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RuleError::InvalidValue { rule, layer, value })
    }
}

/// Builder for [`RuleTable`]. Later entries for the same key win; values are
/// validated once, in [`RuleTableBuilder::build`].
#[derive(Debug, Clone)]
pub struct RuleTableBuilder {
    table: RuleTable,
}

impl Default for RuleTableBuilder {
    fn default() -> Self {
        Self {
            table: RuleTable {
                lambda: 1.0,
                min_width: BTreeMap::new(),
                min_spacing: BTreeMap::new(),
                min_enclosure: BTreeMap::new(),
            },
        }
    }
}

impl RuleTableBuilder {
    pub fn lambda(mut self, lambda: f64) -> Self {
        self.table.lambda = lambda;
        self
    }

    pub fn min_width(mut self, layer: Layer, value: f64) -> Self {
        self.table.min_width.insert(layer, value);
        self
    }

    pub fn min_spacing(mut self, layer: Layer, value: f64) -> Self {
        self.table.min_spacing.insert(layer, value);
        self
    }

    pub fn min_enclosure(mut self, enclosed: Layer, enclosing: Layer, value: f64) -> Self {
        self.table
            .min_enclosure
            .entry(enclosed)
            .or_default()
            .insert(enclosing, value);
        self
    }

    /// Reject non-finite or negative thresholds, a non-positive lambda, and
    /// layers enclosing themselves.
    pub fn build(self) -> Result<RuleTable, RuleError> {
        let table = self.table;
        if !(table.lambda.is_finite() && table.lambda > 0.0) {
            return Err(RuleError::InvalidLambda(table.lambda));
        }
        for (layer, value) in &table.min_width {
            check_value("min_width", *layer, *value)?;
        }
        for (layer, value) in &table.min_spacing {
            check_value("min_spacing", *layer, *value)?;
        }
        for (enclosed, margins) in &table.min_enclosure {
            for (enclosing, value) in margins {
                if enclosing == enclosed {
                    return Err(RuleError::SelfEnclosure(*enclosed));
                }
                check_value("min_enclosure", *enclosed, *value)?;
            }
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lambda_default_values() {
        let rules = RuleTable::lambda_default(20.0).unwrap();
        assert_eq!(rules.min_width(Layer::Metal1), Some(40.0));
        assert_eq!(rules.min_width(Layer::Contact), Some(20.0));
        assert_eq!(rules.min_spacing(Layer::Well), Some(40.0));
        assert_eq!(rules.min_enclosure(Layer::Contact, Layer::Diffusion), Some(20.0));
        assert_eq!(rules.min_enclosure(Layer::Contact, Layer::Well), None);
        assert_eq!(rules.min_enclosure(Layer::Metal1, Layer::Contact), None);
    }

    #[test]
    fn test_enclosing_layers_in_layer_order() {
        let rules = RuleTable::lambda_default(20.0).unwrap();
        let layers: Vec<Layer> = rules
            .enclosing_layers(Layer::Contact)
            .into_iter()
            .map(|(l, _)| l)
            .collect();
        assert_eq!(
            layers,
            vec![Layer::Metal1, Layer::Metal2, Layer::Poly, Layer::Diffusion]
        );
        assert_eq!(rules.enclosed_layers().collect::<Vec<_>>(), vec![Layer::Contact]);
        assert!(rules.enclosing_layers(Layer::Poly).is_empty());
    }

    #[test]
    fn test_missing_rule_is_absent_not_zero() {
        let rules = RuleTable::builder().min_width(Layer::Poly, 3.0).build().unwrap();
        assert_eq!(rules.min_width(Layer::Metal1), None);
        assert_eq!(rules.min_spacing(Layer::Poly), None);
    }

    #[test]
    fn test_more_than_one_enclosed_layer() {
        let rules = RuleTable::builder()
            .min_enclosure(Layer::Contact, Layer::Metal1, 1.0)
            .min_enclosure(Layer::Diffusion, Layer::Well, 5.0)
            .build()
            .unwrap();
        assert_eq!(
            rules.enclosed_layers().collect::<Vec<_>>(),
            vec![Layer::Diffusion, Layer::Contact]
        );
        assert_eq!(rules.min_enclosure(Layer::Diffusion, Layer::Well), Some(5.0));
    }

    #[test]
    fn test_format_length() {
        let rules = RuleTable::lambda_default(20.0).unwrap();
        assert_eq!(rules.format_length(40.0), "2λ");
        assert_eq!(rules.format_length(30.0), "1.5λ");
    }

    #[test]
    fn test_builder_rejects_nan_threshold() {
        let err = RuleTable::builder()
            .min_spacing(Layer::Poly, f64::NAN)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            RuleError::InvalidValue { rule: "min_spacing", layer: Layer::Poly, .. }
        ));
    }

    #[test]
    fn test_builder_rejects_infinite_and_negative_values() {
        let err = RuleTable::builder()
            .min_enclosure(Layer::Contact, Layer::Metal1, f64::INFINITY)
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            RuleError::InvalidValue { rule: "min_enclosure", layer: Layer::Contact, .. }
        ));

        let err = RuleTable::builder()
            .min_width(Layer::Well, -1.0)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RuleError::InvalidValue { rule: "min_width", layer: Layer::Well, value: -1.0 }
        );
    }

    #[test]
    fn test_builder_rejects_bad_lambda_and_self_enclosure() {
        assert!(matches!(
            RuleTable::lambda_default(f64::NAN),
            Err(RuleError::InvalidLambda(_))
        ));
        assert_eq!(
            RuleTable::builder().lambda(0.0).build(),
            Err(RuleError::InvalidLambda(0.0))
        );
        assert_eq!(
            RuleTable::builder()
                .min_enclosure(Layer::Poly, Layer::Poly, 1.0)
                .build(),
            Err(RuleError::SelfEnclosure(Layer::Poly))
        );
    }
}
