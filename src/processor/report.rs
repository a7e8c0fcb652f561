//! Post-export report of the canonical tile ids the maps still reference.
//! The game's importer uses it to prune unused atlas entries.

use std::collections::BTreeSet;

use crate::model::MapDocument;
use crate::processor::gid;

/// Distinct raw ids used by any csv layer of the given documents, sorted
/// ascending. Flip flags are masked off and empty cells skipped.
pub fn used_gids<'a>(docs: impl IntoIterator<Item = &'a MapDocument>) -> Vec<u32> {
    let mut used = BTreeSet::new();
    for doc in docs {
        for (_, grid) in doc.csv_layers() {
            for row in &grid {
                for &code in row {
                    let (raw, _) = gid::decode(code);
                    if raw != 0 {
                        used.insert(raw);
                    }
                }
            }
        }
    }
    used.into_iter().collect()
}
