//! The tileset catalog: every standardized tileset's cell count and declared
//! priority level. Built once from configuration and read-only for the rest
//! of the run; every map is standardized against the same catalog.

use std::collections::BTreeMap;

use crate::model::{CELL_SIZE, TALL_CELL_HEIGHT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tileset {
    pub name: String,
    /// Smaller levels are addressed first; equal levels order by name.
    pub priority: u32,
    pub cell_count: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tilesets: BTreeMap<String, Tileset>,
}

impl Catalog {
    pub fn insert(&mut self, tileset: Tileset) {
        self.tilesets.insert(tileset.name.clone(), tileset);
    }

    pub fn get(&self, name: &str) -> Option<&Tileset> {
        self.tilesets.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tileset> {
        self.tilesets.values()
    }

    pub fn len(&self) -> usize {
        self.tilesets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tilesets.is_empty()
    }

    pub fn total_cells(&self) -> u32 {
        self.tilesets.values().map(|t| t.cell_count).sum()
    }
}

/// Number of addressable cells in a tileset image.
/// Tall tilesets use 16x32 cells, everything else 16x16.
pub fn cell_count(width: u32, height: u32, tall: bool) -> u32 {
    if tall {
        (width / CELL_SIZE) * (height / TALL_CELL_HEIGHT)
    } else {
        (width * height) / (CELL_SIZE * CELL_SIZE)
    }
}
