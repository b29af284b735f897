//! Glob patterns for atlas inputs that can be read straight out of an atlas
//! config, plus the filesystem walk that resolves them.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use globset::{Glob as InnerGlob, GlobMatcher};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use walkdir::WalkDir;

pub use globset::Error;

#[derive(Debug, Clone)]
pub struct Glob {
    inner: InnerGlob,
    matcher: GlobMatcher,
}

impl Glob {
    pub fn new(glob: &str) -> Result<Self, Error> {
        let inner = InnerGlob::new(glob)?;
        let matcher = inner.compile_matcher();

        Ok(Glob { inner, matcher })
    }

    pub fn is_match<P: AsRef<Path>>(&self, path: P) -> bool {
        self.matcher.is_match(path)
    }

    /// Lists every file under `root` whose path relative to `root` matches
    /// this glob, in a stable order.
    ///
    /// Only the part of the tree below the glob's literal prefix is walked.
    pub fn find_files(&self, root: &Path) -> Result<Vec<PathBuf>, walkdir::Error> {
        let base_path = root.join(literal_prefix(Path::new(self.inner.glob())));
        log::trace!(
            "Searching for inputs in '{}' matching '{}'",
            base_path.display(),
            self,
        );

        let mut found = Vec::new();

        for entry in WalkDir::new(base_path).sort_by(|a, b| a.file_name().cmp(b.file_name())) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let is_match = entry
                .path()
                .strip_prefix(root)
                .map(|relative| self.is_match(relative))
                .unwrap_or(false);

            if is_match {
                found.push(entry.into_path());
            }
        }

        Ok(found)
    }
}

impl PartialEq for Glob {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl Eq for Glob {}

impl Serialize for Glob {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.inner.glob())
    }
}

impl<'de> Deserialize<'de> for Glob {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let glob = String::deserialize(deserializer)?;

        Glob::new(&glob).map_err(D::Error::custom)
    }
}

impl fmt::Display for Glob {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.inner.fmt(f)
    }
}

// Characters that suggest a path component uses pattern syntax, like "*.png",
// rather than naming a fixed folder or file. Escaped patterns like `[*]` are
// treated as patterns too, which only means walking a little more than needed.
const PATTERN_CHARACTERS: &[char] = &['*', '?', '{', '}', '[', ']'];

/// The leading components of a glob that don't contain any pattern syntax.
fn literal_prefix(glob_path: &Path) -> PathBuf {
    glob_path
        .iter()
        .take_while(|component| {
            !component
                .to_string_lossy()
                .contains(|c: char| PATTERN_CHARACTERS.contains(&c))
        })
        .collect()
}
