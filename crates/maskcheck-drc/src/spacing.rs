use std::collections::BTreeMap;

use maskcheck_core::{Layer, Shape};

use crate::rules::RuleTable;
use crate::violation::{DrcViolation, Offenders, ViolationKind};

/// Corridor gap between two rectangles: the smaller of the closest
/// horizontal edge distance and the closest vertical edge distance.
///
/// This is not the true boundary distance. Diagonally offset or overlapping
/// rectangles can measure smaller or larger than their real clearance; the
/// measure is kept as-is so results stay comparable with existing decks.
pub fn separation(a: &Shape, b: &Shape) -> f64 {
    let horizontal = (a.x + a.width - b.x).abs().min((b.x + b.width - a.x).abs());
    let vertical = (a.y + a.height - b.y).abs().min((b.y + b.height - a.y).abs());
    horizontal.min(vertical)
}

/// Minimum spacing pass over same-layer pairs.
///
/// Each unordered pair is reported at most once, as `(earlier, later)` in
/// input order. Shapes are grouped by layer first so cross-layer pairs are
/// never measured; the output is ordered by input position regardless.
pub fn check_spacing(shapes: &[Shape], rules: &RuleTable) -> Vec<DrcViolation> {
    let mut buckets: BTreeMap<Layer, Vec<usize>> = BTreeMap::new();
    for (i, shape) in shapes.iter().enumerate() {
        if shape.is_degenerate() || rules.min_spacing(shape.layer).is_none() {
            continue;
        }
        buckets.entry(shape.layer).or_default().push(i);
    }

    let mut found: Vec<(usize, usize, DrcViolation)> = Vec::new();
    for (layer, indices) in &buckets {
        let Some(min_spacing) = rules.min_spacing(*layer) else {
            continue;
        };
        for (n, &i) in indices.iter().enumerate() {
            for &j in &indices[n + 1..] {
                let (a, b) = (&shapes[i], &shapes[j]);
                let gap = separation(a, b);
                log::trace!(
                    "spacing {} / {} on {}: {} against {}",
                    a.id,
                    b.id,
                    layer,
                    gap,
                    min_spacing
                );
                if gap < min_spacing {
                    found.push((
                        i,
                        j,
                        DrcViolation {
                            kind: ViolationKind::Spacing,
                            layer: *layer,
                            message: format!(
                                "{} spacing is less than {}",
                                layer,
                                rules.format_length(min_spacing)
                            ),
                            offenders: Offenders::Pair {
                                shape1: a.id,
                                shape2: b.id,
                            },
                            threshold: min_spacing,
                            bbox: a.bbox().union(&b.bbox()),
                        },
                    ));
                }
            }
        }
    }

    found.sort_by_key(|(i, j, _)| (*i, *j));
    found.into_iter().map(|(_, _, v)| v).collect()
}
