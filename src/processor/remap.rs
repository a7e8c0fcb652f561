//! The remap table and the collect phase of the rewrite pass.
//!
//! Every tile code is evaluated against the original, unmodified grids and
//! the replacements are recorded in a side buffer; the orchestrator commits
//! them afterwards. Canonical and current ranges of different tilesets can
//! overlap numerically, so an in-place rewrite would corrupt cells that were
//! already correct or remap them twice.

use crate::error::{Error, Location, Result};
use crate::model::Grid;
use crate::processor::current::CurrentRange;
use crate::processor::gid;
use crate::processor::hierarchy::CanonicalRanges;

/// What to do with a non-zero raw id that no current range covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnresolvedPolicy {
    /// Fail the map on the first unresolved code (the default; a dangling
    /// reference would otherwise ship inside a broken map).
    Abort,
    /// Leave the offending location untouched, warn, and keep counting.
    Skip,
}

/// Tally of one map's rewrite pass.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RemapReport {
    pub remapped: usize,
    pub skipped: usize,
    pub zeroed: usize,
}

#[derive(Debug)]
struct RemapEntry {
    old_first: u32,
    new_first: u32,
    count: u32,
}

/// Offset substitutions from current to canonical ranges, one entry per
/// tileset declared by the map. Within a tileset the mapping is a constant
/// shift, so no per-id table is materialised.
#[derive(Debug)]
pub struct RemapTable {
    entries: Vec<RemapEntry>,
}

impl RemapTable {
    pub fn build(current: &[CurrentRange], canonical: &CanonicalRanges) -> Self {
        let entries = current
            .iter()
            .filter_map(|cur| {
                canonical.get(&cur.name).map(|canon| RemapEntry {
                    old_first: cur.first,
                    new_first: canon.first,
                    count: cur.count,
                })
            })
            .collect();
        RemapTable { entries }
    }

    /// Canonical raw id for `raw`, or `None` when no current range covers it.
    /// Raw id 0 ("no tile") is never mapped.
    pub fn lookup(&self, raw: u32) -> Option<u32> {
        if raw == 0 {
            return None;
        }
        self.entries
            .iter()
            .find(|e| raw >= e.old_first && raw < e.old_first + e.count)
            .map(|e| raw - e.old_first + e.new_first)
    }
}

/// One recorded cell replacement, not yet written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEdit {
    pub layer: String,
    pub row: usize,
    pub col: usize,
    pub code: u32,
}

/// One recorded object-gid replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEdit {
    pub group: String,
    pub id: u32,
    pub code: u32,
}

/// Scans a layer grid and records every cell whose code changes.
pub fn collect_grid_edits(
    layer: &str,
    grid: &Grid,
    table: &RemapTable,
    policy: UnresolvedPolicy,
    edits: &mut Vec<CellEdit>,
    skipped: &mut usize,
) -> Result<()> {
    for (row, cells) in grid.iter().enumerate() {
        for (col, &code) in cells.iter().enumerate() {
            let (raw, flipped) = gid::decode(code);
            if raw == 0 {
                continue;
            }
            match table.lookup(raw) {
                Some(new) if new != raw => edits.push(CellEdit {
                    layer: layer.to_string(),
                    row,
                    col,
                    code: gid::encode(new, flipped),
                }),
                Some(_) => {}
                None => {
                    let location = Location::Cell {
                        layer: layer.to_string(),
                        row,
                        col,
                    };
                    unresolved(code, location, policy, skipped)?;
                }
            }
        }
    }
    Ok(())
}

/// Evaluates one gid-bearing object and records its replacement if any.
pub fn collect_object_edit(
    group: &str,
    id: u32,
    code: u32,
    table: &RemapTable,
    policy: UnresolvedPolicy,
    edits: &mut Vec<ObjectEdit>,
    skipped: &mut usize,
) -> Result<()> {
    let (raw, flipped) = gid::decode(code);
    if raw == 0 {
        return Ok(());
    }
    match table.lookup(raw) {
        Some(new) if new != raw => edits.push(ObjectEdit {
            group: group.to_string(),
            id,
            code: gid::encode(new, flipped),
        }),
        Some(_) => {}
        None => {
            let location = Location::Object {
                group: group.to_string(),
                id,
            };
            unresolved(code, location, policy, skipped)?;
        }
    }
    Ok(())
}

fn unresolved(
    code: u32,
    location: Location,
    policy: UnresolvedPolicy,
    skipped: &mut usize,
) -> Result<()> {
    match policy {
        UnresolvedPolicy::Abort => Err(Error::UnresolvedTileCode { code, location }),
        UnresolvedPolicy::Skip => {
            println!("Warning: tile code {code} at {location} is outside every declared range, left untouched");
            *skipped += 1;
            Ok(())
        }
    }
}
