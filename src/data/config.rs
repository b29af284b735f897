use std::{
    fs, io,
    path::{Path, PathBuf},
};

use maxrects::PackingOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::glob::Glob;

static CONFIG_FILENAME: &str = "atlas.toml";

/// Describes one texture atlas, contained in an atlas.toml file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct AtlasConfig {
    /// The name of the atlas. Output files are named after it.
    pub name: String,

    /// The largest size any page of the atlas is allowed to grow to.
    #[serde(default = "default_max_size")]
    pub max_size: (u32, u32),

    /// Space kept between neighboring sprites.
    #[serde(default)]
    pub padding: u32,

    #[serde(default)]
    pub options: PackingOptions<u32>,

    /// Groups of inputs. Sprites from different pages never share a bin.
    #[serde(default)]
    pub pages: Vec<PageConfig>,

    /// The path that this config came from. Paths from this config should be
    /// relative to the folder containing this file.
    #[serde(skip)]
    pub file_path: PathBuf,
}

impl AtlasConfig {
    pub fn read_from_folder_or_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let meta = fs::metadata(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;

        if meta.is_file() {
            Self::read_from_file(path)
        } else {
            Self::read_from_folder(path)
        }
    }

    pub fn read_from_folder<P: AsRef<Path>>(folder_path: P) -> Result<Self, ConfigError> {
        let file_path = folder_path.as_ref().join(CONFIG_FILENAME);

        Self::read_from_file(file_path)
    }

    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;

        let mut config: Self = toml::from_slice(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_owned(),
            source,
        })?;
        config.file_path = path.to_owned();

        Ok(config)
    }

    /// The path that paths in this config should be considered relative to.
    pub fn folder(&self) -> &Path {
        self.file_path.parent().unwrap_or_else(|| Path::new(""))
    }
}

fn default_max_size() -> (u32, u32) {
    (1024, 1024)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PageConfig {
    /// Globs matching the PNG files packed into this page.
    #[serde(default)]
    pub inputs: Vec<Glob>,

    /// Blank regions to set aside, for content drawn into the atlas later.
    #[serde(default)]
    pub reserve: Vec<ReserveConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ReserveConfig {
    pub name: String,
    pub size: (u32, u32),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{} in {}", .source, .path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("{} in {}", .source, .path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl ConfigError {
    /// Tells whether this ConfigError originated because of a path not
    /// existing.
    pub fn is_not_found(&self) -> bool {
        match self {
            ConfigError::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}
