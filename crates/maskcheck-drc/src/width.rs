use maskcheck_core::Shape;

use crate::rules::RuleTable;
use crate::violation::{DrcViolation, Offenders, ViolationKind};

/// Minimum width pass. Emits violations in input order.
///
/// Degenerate shapes on a layer with a width rule always violate it.
pub fn check_width(shapes: &[Shape], rules: &RuleTable) -> Vec<DrcViolation> {
    let mut violations = Vec::new();
    for shape in shapes {
        let Some(min_width) = rules.min_width(shape.layer) else {
            continue;
        };
        log::trace!(
            "width {}: {}x{} against {}",
            shape.id,
            shape.width,
            shape.height,
            min_width
        );
        if shape.is_degenerate() || shape.width < min_width || shape.height < min_width {
            violations.push(DrcViolation {
                kind: ViolationKind::Width,
                layer: shape.layer,
                message: format!(
                    "{} width/height is less than {}",
                    shape.layer,
                    rules.format_length(min_width)
                ),
                offenders: Offenders::Single { shape: shape.id },
                threshold: min_width,
                bbox: shape.bbox(),
            });
        }
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use maskcheck_core::Layer;

    #[test]
    fn test_too_narrow_metal() {
        let rules = RuleTable::lambda_default(20.0).unwrap();
        let shape = Shape::new(Layer::Metal1, 0.0, 0.0, 10.0, 10.0);
        let v = check_width(std::slice::from_ref(&shape), &rules);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].kind, ViolationKind::Width);
        assert_eq!(v[0].layer, Layer::Metal1);
        assert_eq!(v[0].offenders, Offenders::Single { shape: shape.id });
        assert_eq!(v[0].message, "metal1 width/height is less than 2λ");
        assert_eq!(v[0].threshold, 40.0);
    }

    #[test]
    fn test_one_dimension_is_enough() {
        let rules = RuleTable::lambda_default(20.0).unwrap();
        let shapes = vec![
            Shape::new(Layer::Poly, 0.0, 0.0, 200.0, 39.0),
            Shape::new(Layer::Poly, 0.0, 0.0, 39.0, 200.0),
            Shape::new(Layer::Poly, 0.0, 0.0, 40.0, 40.0),
        ];
        let v = check_width(&shapes, &rules);
        let flagged: Vec<_> = v.iter().map(|v| v.shape_ids()[0]).collect();
        assert_eq!(flagged, vec![shapes[0].id, shapes[1].id]);
    }

    #[test]
    fn test_layer_without_rule_skipped() {
        let rules = RuleTable::builder().min_width(Layer::Metal1, 40.0).build().unwrap();
        let shapes = vec![Shape::new(Layer::Well, 0.0, 0.0, 1.0, 1.0)];
        assert!(check_width(&shapes, &rules).is_empty());
    }

    #[test]
    fn test_degenerate_shape_violates() {
        let rules = RuleTable::builder().min_width(Layer::Metal2, 0.0).build().unwrap();
        let shapes = vec![
            Shape::new(Layer::Metal2, 0.0, 0.0, 0.0, 10.0),
            Shape::new(Layer::Metal2, 0.0, 0.0, f64::NAN, 10.0),
        ];
        assert_eq!(check_width(&shapes, &rules).len(), 2);
    }
}
