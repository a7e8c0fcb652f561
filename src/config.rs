//! Configuration collaborator.
//!
//! One JSON file drives a run: where the editor project and the exported
//! game assets live, the tileset priority hierarchy and the tall-tileset
//! list. Loading measures every referenced tileset image and produces the
//! immutable catalog the rest of the pipeline shares.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::IMG_EXT;
use crate::processor::catalog::{self, Catalog, Tileset};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfig {
    /// Directory holding the tileset images, relative to the config file.
    tileset_dir: PathBuf,
    /// Directory holding the editor's `.tmx` maps.
    map_dir: PathBuf,
    /// Export destination.
    out_dir: PathBuf,
    /// Tileset name -> priority level (small positive integer, gaps allowed).
    hierarchy: BTreeMap<String, u32>,
    /// Tilesets whose cells are 16x32 instead of 16x16.
    #[serde(default)]
    tall_tilesets: Vec<String>,
}

/// A loaded, resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub map_dir: PathBuf,
    pub out_dir: PathBuf,
    pub catalog: Catalog,
}

/// Loads the config file and builds the catalog.
///
/// A tileset named by the hierarchy whose image cannot be measured is fatal
/// here: no range downstream can be computed without its cell count.
pub fn load(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path)
        .map_err(|e| Error::config(format!("reading {}: {e}", path.display())))?;
    let raw: RawConfig = serde_json::from_str(&text)
        .map_err(|e| Error::config(format!("parsing {}: {e}", path.display())))?;

    let base = path.parent().unwrap_or(Path::new("."));
    let tileset_dir = base.join(&raw.tileset_dir);

    let mut catalog = Catalog::default();
    for (name, &priority) in &raw.hierarchy {
        let img = tileset_dir.join(format!("{name}{IMG_EXT}"));
        let (width, height) = image::image_dimensions(&img).map_err(|e| {
            Error::config(format!(
                "tileset '{name}': cannot measure {}: {e}",
                img.display()
            ))
        })?;
        let tall = raw.tall_tilesets.iter().any(|t| t == name);
        catalog.insert(Tileset {
            name: name.clone(),
            priority,
            cell_count: catalog::cell_count(width, height, tall),
        });
    }

    Ok(Config {
        map_dir: base.join(&raw.map_dir),
        out_dir: base.join(&raw.out_dir),
        catalog,
    })
}
