use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path configuration / tileset hierarchy file (.json)
    pub config: PathBuf,
    /// Specific .tmx maps to export; defaults to every map in the
    /// configured map directory
    pub maps: Vec<PathBuf>,
    /// What to do with a tile code that falls outside every declared
    /// tileset range
    #[arg(long, value_enum, default_value_t = OnUnresolved::Abort)]
    pub on_unresolved: OnUnresolved,
    /// Also write usedGid.json listing every canonical tile id the
    /// exported maps reference
    #[arg(long)]
    pub used_gids: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OnUnresolved {
    /// Fail the map on the first unresolved tile code
    Abort,
    /// Leave the offending location untouched and warn
    Skip,
}
