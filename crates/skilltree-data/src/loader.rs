//! Locating and parsing catalog files.
//!
//! A data directory holds at most one file per [`CatalogFile`], in any one
//! of the supported [`Format`]s. TOML cannot express a top-level array, so
//! a TOML categories file wraps its list in a `categories` table (see
//! [`TomlCategories`]).

use serde::de::DeserializeOwned;
use skilltree_core::PerkTreeError;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::schema::{CategoryData, SettingsData, TomlCategories};

/// Failure to turn a data directory into a catalog.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    #[error("no {file} file (.ron, .json or .toml) in {dir}")]
    Missing { file: CatalogFile, dir: PathBuf },

    #[error("{file} has an unsupported extension; expected .ron, .json or .toml")]
    UnsupportedFormat { file: PathBuf },

    /// More than one format of the same catalog file. The loader will not
    /// guess which one is current.
    #[error("{file} is defined more than once: {}", join_paths(.found))]
    Ambiguous { file: CatalogFile, found: Vec<PathBuf> },

    #[error("cannot parse {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// The file parsed but does not describe a valid perk graph.
    #[error("invalid catalog in {file}: {source}")]
    Catalog {
        file: PathBuf,
        #[source]
        source: PerkTreeError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Files and formats
// ---------------------------------------------------------------------------

/// The files a data directory may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogFile {
    /// Category and perk definitions. Required.
    Categories,
    /// Engine settings such as the level curve. Optional.
    Settings,
}

impl CatalogFile {
    /// File name without extension.
    pub fn stem(self) -> &'static str {
        match self {
            CatalogFile::Categories => "categories",
            CatalogFile::Settings => "settings",
        }
    }
}

impl fmt::Display for CatalogFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.stem())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Json,
    Toml,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Ron, Format::Json, Format::Toml];

    pub fn extension(self) -> &'static str {
        match self {
            Format::Ron => "ron",
            Format::Json => "json",
            Format::Toml => "toml",
        }
    }

    /// Format of a path, by extension.
    pub fn of(path: &Path) -> Result<Format, DataLoadError> {
        let ext = path.extension().and_then(|e| e.to_str());
        Format::ALL
            .into_iter()
            .find(|f| Some(f.extension()) == ext)
            .ok_or_else(|| DataLoadError::UnsupportedFormat {
                file: path.to_path_buf(),
            })
    }

    fn parse<T: DeserializeOwned>(self, content: &str, file: &Path) -> Result<T, DataLoadError> {
        let detail = match self {
            Format::Ron => ron::from_str(content).map_err(|e| e.to_string()),
            Format::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Format::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        };
        detail.map_err(|detail| DataLoadError::Parse {
            file: file.to_path_buf(),
            detail,
        })
    }
}

/// Find `file` in `dir`. `Ok(None)` if absent in every format.
pub fn locate(dir: &Path, file: CatalogFile) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Vec<PathBuf> = Format::ALL
        .iter()
        .map(|f| dir.join(format!("{}.{}", file.stem(), f.extension())))
        .filter(|path| path.is_file())
        .collect();

    match found.len() {
        0 => Ok(None),
        1 => Ok(found.pop()),
        _ => Err(DataLoadError::Ambiguous { file, found }),
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse category definitions. `file` names the source in errors.
pub fn parse_categories(
    content: &str,
    format: Format,
    file: &Path,
) -> Result<Vec<CategoryData>, DataLoadError> {
    match format {
        Format::Ron | Format::Json => format.parse(content, file),
        Format::Toml => format
            .parse::<TomlCategories>(content, file)
            .map(|wrapper| wrapper.categories),
    }
}

pub fn read_categories(path: &Path) -> Result<Vec<CategoryData>, DataLoadError> {
    let format = Format::of(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_categories(&content, format, path)
}

pub fn read_settings(path: &Path) -> Result<SettingsData, DataLoadError> {
    let format = Format::of(path)?;
    let content = std::fs::read_to_string(path)?;
    format.parse(&content, path)
}
