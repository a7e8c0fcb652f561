pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod processor;
pub mod writer;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use processor::UnresolvedPolicy;

pub fn run() -> anyhow::Result<()> {
    let args = cli::Cli::parse();
    let policy = match args.on_unresolved {
        cli::OnUnresolved::Abort => UnresolvedPolicy::Abort,
        cli::OnUnresolved::Skip => UnresolvedPolicy::Skip,
    };

    // 1. ── Configuration ──────────────────────────────────────────────
    let cfg = config::load(&args.config)
        .with_context(|| format!("Loading {}", args.config.display()))?;
    let canonical = processor::hierarchy::canonical_ranges(&cfg.catalog);
    println!(
        "Catalog loaded: {} tilesets, {} cells",
        cfg.catalog.len(),
        cfg.catalog.total_cells()
    );

    // 2. ── Collect maps ───────────────────────────────────────────────
    let maps: Vec<PathBuf> = if args.maps.is_empty() {
        map_files(&cfg.map_dir)?
    } else {
        args.maps.clone()
    };

    // 3. ── Standardize & write ────────────────────────────────────────
    fs::create_dir_all(&cfg.out_dir)
        .with_context(|| format!("Creating {}", cfg.out_dir.display()))?;

    let mut exported = Vec::new();
    for path in &maps {
        let xml = fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
        let mut doc = parser::parse(&xml).with_context(|| format!("Parsing {}", path.display()))?;
        let report = processor::standardize(&mut doc, &cfg.catalog, &canonical, policy)
            .with_context(|| format!("Standardizing {}", path.display()))?;

        let file_name = path.file_name().context("map path has no file name")?;
        let dest = cfg.out_dir.join(file_name);
        writer::emit(&doc, &dest).with_context(|| format!("Writing {}", dest.display()))?;
        println!(
            "Exported {} -> {} ({} remapped, {} skipped, {} zeroed)",
            path.display(),
            dest.display(),
            report.remapped,
            report.skipped,
            report.zeroed
        );
        exported.push(doc);
    }

    // 4. ── Used-gid report ────────────────────────────────────────────
    if args.used_gids {
        let gids = processor::report::used_gids(&exported);
        let dest = cfg.out_dir.join("usedGid.json");
        fs::write(&dest, serde_json::to_string_pretty(&gids)?)
            .with_context(|| format!("Writing {}", dest.display()))?;
        println!("Used-gid report: {} ids -> {}", gids.len(), dest.display());
    }

    Ok(())
}

/// Every `.tmx` in the map directory, sorted for a stable processing order.
fn map_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut maps = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("Listing {}", dir.display()))? {
        let path = entry?.path();
        let is_map = path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().ends_with(model::MAP_EXT));
        if is_map {
            maps.push(path);
        }
    }
    maps.sort();
    Ok(maps)
}
