//! Canonical range assignment.
//!
//! The catalog's priority levels define a stable address layout shared by
//! every exported map: lower levels come first, and each tileset's range
//! starts right after the previous one. Id 0 is reserved for "no tile", so
//! the first range starts at 1.

use std::collections::BTreeMap;

use crate::processor::catalog::Catalog;

/// A half-open gid interval `[first, first + count)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GidRange {
    pub first: u32,
    pub count: u32,
}

impl GidRange {
    pub fn end(&self) -> u32 {
        self.first + self.count
    }

    pub fn contains(&self, raw: u32) -> bool {
        raw >= self.first && raw < self.end()
    }
}

/// Canonical range per tileset name.
pub type CanonicalRanges = BTreeMap<String, GidRange>;

/// Computes the canonical range of every catalogued tileset.
///
/// Ordering is priority ascending; equal priorities fall back to tileset
/// name ascending so the layout is a pure function of the catalog and never
/// of iteration order. The resulting ranges are disjoint and tile
/// `[1, total_cells + 1)` exactly.
pub fn canonical_ranges(catalog: &Catalog) -> CanonicalRanges {
    let mut tilesets: Vec<_> = catalog.iter().collect();
    tilesets.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut next = 1u32;
    let mut ranges = CanonicalRanges::new();
    for tileset in tilesets {
        ranges.insert(
            tileset.name.clone(),
            GidRange {
                first: next,
                count: tileset.cell_count,
            },
        );
        next += tileset.cell_count;
    }
    ranges
}
