use rstar::{Envelope, PointDistance, RTree, RTreeObject, AABB};

use crate::geometry::{BBox, Point};

/// An entry in the R-tree spatial index, referencing a shape by its position
/// in the slice the index was built from.
#[derive(Debug, Clone)]
pub struct SpatialEntry {
    pub index: usize,
    pub bbox: BBox,
}

impl RTreeObject for SpatialEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bbox.min.x, self.bbox.min.y],
            [self.bbox.max.x, self.bbox.max.y],
        )
    }
}

impl PointDistance for SpatialEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        Envelope::distance_2(&self.envelope(), point)
    }

    fn contains_point(&self, point: &[f64; 2]) -> bool {
        Envelope::contains_point(&self.envelope(), point)
    }
}

/// Spatial index for hit-testing and region queries.
pub struct SpatialIndex {
    tree: RTree<SpatialEntry>,
}

impl SpatialIndex {
    /// An empty index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Bulk-load an index from all entries at once.
    pub fn build(entries: Vec<SpatialEntry>) -> Self {
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// All entries whose box contains the point (edges inclusive).
    pub fn query_point(&self, point: &Point) -> Vec<&SpatialEntry> {
        self.tree.locate_all_at_point(&[point.x, point.y]).collect()
    }

    /// All entries intersecting the given region.
    pub fn query_region(&self, region: &BBox) -> Vec<&SpatialEntry> {
        let envelope = AABB::from_corners(
            [region.min.x, region.min.y],
            [region.max.x, region.max.y],
        );
        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .collect()
    }

    /// Number of indexed entries.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for SpatialIndex {
    fn default() -> Self {
        Self::new()
    }
}
