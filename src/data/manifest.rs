use std::{
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use fs_err::File;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sprite_name::SpriteName;

/// Describes where every sprite of an atlas ended up. Written next to the
/// atlas pages as `<name>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AtlasManifest {
    pub name: String,
    pub pages: Vec<PageManifest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PageManifest {
    /// File name of this page's image, relative to the manifest. Absent if
    /// no image was written.
    pub image: Option<String>,

    pub size: (u32, u32),

    /// Whether this page holds a single sprite that was too large for the
    /// atlas' maximum size.
    pub oversized: bool,

    /// Fraction of the page covered by sprites.
    pub occupancy: f64,

    pub sprites: Vec<SpriteManifest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SpriteManifest {
    pub name: SpriteName,

    /// Top-left corner of the sprite within its page.
    pub offset: (u32, u32),

    /// Size of the sprite as it's stored in the page. For rotated sprites,
    /// this is the original size with width and height swapped.
    pub size: (u32, u32),

    /// Whether the sprite was turned a quarter turn clockwise to fit.
    pub rotated: bool,
}

impl AtlasManifest {
    pub fn file_name(&self) -> String {
        format!("{}.json", self.name)
    }

    pub fn write_to_folder<P: AsRef<Path>>(&self, folder_path: P) -> Result<PathBuf, ManifestError> {
        let file_path = folder_path.as_ref().join(self.file_name());

        let mut file = BufWriter::new(File::create(&file_path)?);
        serde_json::to_writer_pretty(&mut file, self)?;
        file.flush()?;

        log::trace!("Saved manifest to {}", file_path.display());

        Ok(file_path)
    }
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn serializes_with_kebab_case_keys() {
        let manifest = AtlasManifest {
            name: "ui".to_owned(),
            pages: vec![PageManifest {
                image: Some("ui-0.png".to_owned()),
                size: (64, 32),
                oversized: false,
                occupancy: 0.5,
                sprites: vec![SpriteManifest {
                    name: SpriteName::from("icons/close.png"),
                    offset: (0, 0),
                    size: (32, 32),
                    rotated: false,
                }],
            }],
        };

        insta::assert_snapshot!(serde_json::to_string_pretty(&manifest).unwrap(), @r###"
        {
          "name": "ui",
          "pages": [
            {
              "image": "ui-0.png",
              "size": [
                64,
                32
              ],
              "oversized": false,
              "occupancy": 0.5,
              "sprites": [
                {
                  "name": "icons/close.png",
                  "offset": [
                    0,
                    0
                  ],
                  "size": [
                    32,
                    32
                  ],
                  "rotated": false
                }
              ]
            }
          ]
        }
        "###);

        assert_eq!(manifest.file_name(), "ui.json");
    }
}
