//! Data directory, engine parameters and catalog files.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use cadence_core::{Card, CardCatalog, EngineParams};
use directories::ProjectDirs;
use serde::Deserialize;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "CADENCE_DATA_DIR";

/// File in the data directory holding engine parameters
pub const PARAMS_FILE: &str = "params.json";

/// Pick the data directory: explicit flag, then environment, then the
/// platform project directory.
pub fn resolve_data_dir(flag: Option<PathBuf>, env: Option<OsString>) -> anyhow::Result<PathBuf> {
    if let Some(dir) = flag {
        return Ok(dir);
    }
    if let Some(dir) = env.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let proj_dirs = ProjectDirs::from("com", "cadence", "cadence")
        .ok_or_else(|| anyhow::anyhow!("Could not determine project directories"))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

/// Engine parameters from `--params`, else `<data_dir>/params.json`, else defaults
pub fn load_params(flag: Option<&Path>, data_dir: &Path) -> anyhow::Result<EngineParams> {
    let fallback = data_dir.join(PARAMS_FILE);
    let path = match flag {
        Some(path) => path.to_path_buf(),
        None if fallback.exists() => fallback,
        None => return Ok(EngineParams::default()),
    };

    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read params from {}", path.display()))?;
    let params: EngineParams = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid params in {}", path.display()))?;
    params
        .validate()
        .with_context(|| format!("Rejected params in {}", path.display()))?;
    Ok(params)
}

// ============================================================================
// CATALOG FILES
// ============================================================================

/// Accepted catalog file shapes
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    Library {
        #[serde(default)]
        id: Option<String>,
        cards: Vec<Card>,
    },
    Cards(Vec<Card>),
}

/// A catalog read from disk with the library id it belongs to
#[derive(Debug)]
pub struct LoadedCatalog {
    pub library_id: String,
    pub catalog: CardCatalog,
}

/// Read a catalog file: either a bare JSON array of cards or an object
/// `{ "id": ..., "cards": [...] }`. The library id defaults to the file stem.
pub fn load_catalog(path: &Path) -> anyhow::Result<LoadedCatalog> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    let doc: CatalogDocument = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid catalog {}", path.display()))?;

    let (id, cards) = match doc {
        CatalogDocument::Library { id, cards } => (id, cards),
        CatalogDocument::Cards(cards) => (None, cards),
    };
    let library_id = id
        .or_else(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "default".to_string());
    let catalog = CardCatalog::new(cards)
        .with_context(|| format!("Rejected catalog {}", path.display()))?;

    Ok(LoadedCatalog {
        library_id,
        catalog,
    })
}
