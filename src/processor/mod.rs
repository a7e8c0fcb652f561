//! The standardization core.
//!
//! `standardize` rewrites every tile reference in a parsed map so that ids
//! follow the catalog's canonical layout instead of whatever declaration
//! order the map file happened to record.

pub mod catalog;
pub mod current;
pub mod gid;
pub mod hierarchy;
pub mod remap;
pub mod report;

use std::collections::{BTreeSet, HashMap};

use crate::error::Result;
use crate::model::{self, Grid, MapDocument};
use catalog::Catalog;
use hierarchy::CanonicalRanges;
pub use remap::{RemapReport, UnresolvedPolicy};

/// Runs the whole remap pass over one parsed map:
///
/// 1. resolve the ranges currently in effect and build the offset table,
/// 2. collect every replacement against the original, unmodified codes,
/// 3. commit the recorded edits,
/// 4. rewrite the tileset declarations to canonical firstgids, ordered
///    ascending, dropping out-of-scope ones,
/// 5. zero the gids of collections that only used them as an editor aid.
pub fn standardize(
    doc: &mut MapDocument,
    catalog: &Catalog,
    canonical: &CanonicalRanges,
    policy: UnresolvedPolicy,
) -> Result<RemapReport> {
    let decls = doc.tileset_decls()?;
    let current = current::current_ranges(&decls, catalog)?;
    let table = remap::RemapTable::build(&current, canonical);

    let mut report = RemapReport::default();

    // collect
    let layers = doc.csv_layers();
    let mut cell_edits = Vec::new();
    for (name, grid) in &layers {
        remap::collect_grid_edits(name, grid, &table, policy, &mut cell_edits, &mut report.skipped)?;
    }
    let mut object_edits = Vec::new();
    for group in model::REMAP_OBJECT_GROUPS {
        for (id, code) in doc.gid_objects(group)? {
            remap::collect_object_edit(
                group,
                id,
                code,
                &table,
                policy,
                &mut object_edits,
                &mut report.skipped,
            )?;
        }
    }

    // commit
    let mut grids: HashMap<String, Grid> = layers.into_iter().collect();
    let mut touched = BTreeSet::new();
    for edit in &cell_edits {
        if let Some(grid) = grids.get_mut(&edit.layer) {
            grid[edit.row][edit.col] = edit.code;
            touched.insert(edit.layer.clone());
        }
    }
    for layer in &touched {
        doc.set_csv_layer(layer, &grids[layer]);
    }
    for edit in &object_edits {
        doc.set_object_gid(&edit.group, edit.id, edit.code);
    }
    report.remapped = cell_edits.len() + object_edits.len();

    // declarations: drop out-of-scope ones, point the rest at the canonical
    // firstgid and the standardized asset location
    doc.retain_tilesets(|el| el.attr("source").is_some_and(model::is_standard_source));
    for range in &current {
        if let Some(canon) = canonical.get(&range.name) {
            doc.update_tileset_decl(
                &range.name,
                canon.first,
                format!(
                    "{}/{}{}",
                    model::STANDARD_TILESET_DIR,
                    range.name,
                    model::TILESET_EXT
                ),
            );
        }
    }
    doc.sort_tileset_decls();

    // transient references only existed for the editor
    for group in model::ZERO_OBJECT_GROUPS {
        report.zeroed += doc.zero_object_gids(group);
    }

    Ok(report)
}
