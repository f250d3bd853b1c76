use maskcheck_core::Shape;

use crate::enclosure::check_enclosure;
use crate::report::DrcReport;
use crate::rules::RuleTable;
use crate::spacing::check_spacing;
use crate::violation::DrcViolation;
use crate::width::check_width;

/// Runs the width, spacing and enclosure passes against one rule table.
///
/// The engine holds no state besides its rules. Each call borrows a shape
/// snapshot and returns freshly built violations; identical input always
/// yields an identical list.
#[derive(Debug, Clone)]
pub struct DrcEngine {
    rules: RuleTable,
}

impl DrcEngine {
    pub fn new(rules: RuleTable) -> Self {
        Self { rules }
    }

    /// The rule table every pass reads from.
    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// All violations: width first, then spacing, then enclosure.
    /// No deduplication happens across passes.
    pub fn check(&self, shapes: &[Shape]) -> Vec<DrcViolation> {
        let width = self.check_width(shapes);
        let spacing = self.check_spacing(shapes);
        let enclosure = self.check_enclosure(shapes);
        log::debug!(
            "DRC over {} shapes: {} width, {} spacing, {} enclosure violations",
            shapes.len(),
            width.len(),
            spacing.len(),
            enclosure.len()
        );

        let mut violations = width;
        violations.extend(spacing);
        violations.extend(enclosure);
        violations
    }

    /// Width pass only, in input order.
    pub fn check_width(&self, shapes: &[Shape]) -> Vec<DrcViolation> {
        check_width(shapes, &self.rules)
    }

    /// Spacing pass only, one violation per offending pair.
    pub fn check_spacing(&self, shapes: &[Shape]) -> Vec<DrcViolation> {
        check_spacing(shapes, &self.rules)
    }

    /// Enclosure pass only, grouped by cut shape.
    pub fn check_enclosure(&self, shapes: &[Shape]) -> Vec<DrcViolation> {
        check_enclosure(shapes, &self.rules)
    }

    /// Run [`DrcEngine::check`] and wrap the result for the results panel.
    pub fn report(&self, shapes: &[Shape]) -> DrcReport {
        DrcReport::new(self.check(shapes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::violation::ViolationKind;
    use maskcheck_core::Layer;

    fn lambda_engine() -> DrcEngine {
        DrcEngine::new(RuleTable::lambda_default(20.0).unwrap())
    }

    #[test]
    fn test_empty_input() {
        let engine = lambda_engine();
        assert!(engine.check(&[]).is_empty());
    }

    #[test]
    fn test_pass_order_and_no_cross_pass_dedup() {
        let engine = lambda_engine();
        // Undersized contact, too close to its neighbour, nothing enclosing either.
        let shapes = vec![
            Shape::new(Layer::Contact, 0.0, 0.0, 10.0, 10.0),
            Shape::new(Layer::Contact, 15.0, 0.0, 20.0, 20.0),
        ];
        let kinds: Vec<ViolationKind> = engine.check(&shapes).iter().map(|v| v.kind).collect();
        let first_spacing = kinds.iter().position(|k| *k == ViolationKind::Spacing).unwrap();
        let first_enclosure = kinds.iter().position(|k| *k == ViolationKind::Enclosure).unwrap();
        assert_eq!(kinds[0], ViolationKind::Width);
        assert!(kinds[..first_spacing].iter().all(|k| *k == ViolationKind::Width));
        assert!(first_spacing < first_enclosure);
        assert!(kinds[first_enclosure..].iter().all(|k| *k == ViolationKind::Enclosure));
        // 1 width + 1 spacing + 4 enclosure per contact.
        assert_eq!(kinds.len(), 1 + 1 + 8);
    }

    #[test]
    fn test_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DrcEngine>();
    }
}
