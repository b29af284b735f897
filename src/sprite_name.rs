use std::{
    fmt,
    path::{self, Path},
    sync::Arc,
};

use serde::{Deserialize, Serialize};

/// The name a sprite is known by in an atlas manifest.
///
/// Sprites discovered on disk are named by their path relative to the atlas
/// config, always using `/` as the separator so manifests are identical
/// across platforms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpriteName(Arc<str>);

impl SpriteName {
    /// Names a sprite by the portion of `sprite_path` under `root_path`.
    /// Returns `None` if the sprite isn't inside of the root.
    pub fn from_paths(root_path: &Path, sprite_path: &Path) -> Option<Self> {
        let relative = sprite_path.strip_prefix(root_path).ok()?;
        let displayed = format!("{}", relative.display());

        let displayed = if path::MAIN_SEPARATOR == '/' {
            displayed
        } else {
            displayed.replace(path::MAIN_SEPARATOR, "/")
        };

        Some(SpriteName(displayed.into()))
    }
}

impl From<&str> for SpriteName {
    fn from(name: &str) -> Self {
        SpriteName(name.into())
    }
}

impl AsRef<str> for SpriteName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpriteName {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn relative_to_root() {
        let root = Path::new("project");
        let sprite = root.join("icons").join("close.png");

        let name = SpriteName::from_paths(root, &sprite).unwrap();
        assert_eq!(name.as_ref(), "icons/close.png");
    }

    #[test]
    fn outside_of_root() {
        assert!(SpriteName::from_paths(Path::new("a"), Path::new("b/c.png")).is_none());
    }
}
