//! Current-map range resolution.
//!
//! A map file records its own firstgid per tileset, in whatever order the
//! editor happened to declare them. These ephemeral ranges only live for the
//! duration of one map's remap pass.

use crate::error::{Error, Result};
use crate::model::TilesetDecl;
use crate::processor::catalog::Catalog;

/// Where a tileset's tiles actually live in one specific map file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentRange {
    pub name: String,
    pub first: u32,
    pub count: u32,
}

impl CurrentRange {
    pub fn end(&self) -> u32 {
        self.first + self.count
    }

    pub fn contains(&self, raw: u32) -> bool {
        raw >= self.first && raw < self.end()
    }
}

/// Resolves the ranges in effect before standardization.
///
/// Declarations outside the standardized category (character sheets and the
/// like) are dropped from consideration here; the remap engine removes them
/// from the exported document. A standard declaration naming a tileset the
/// catalog does not know is a configuration/data mismatch and fails the map.
/// The cell count always comes from the catalog, never from the map file.
pub fn current_ranges(decls: &[TilesetDecl], catalog: &Catalog) -> Result<Vec<CurrentRange>> {
    decls
        .iter()
        .filter(|d| d.is_standard())
        .map(|d| {
            let tileset = catalog
                .get(&d.name)
                .ok_or_else(|| Error::DeclarationMismatch {
                    name: d.name.clone(),
                    first_gid: d.first_gid,
                })?;
            Ok(CurrentRange {
                name: d.name.clone(),
                first: d.first_gid,
                count: tileset.cell_count,
            })
        })
        .collect()
}
