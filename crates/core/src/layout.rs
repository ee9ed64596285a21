//! Named directory layout for a project.
//!
//! A [`PathLayout`] is an ordered list of [`PathEntry`] values, each pairing a logical name with a
//! directory relative to the project base. It contains **no I/O logic** beyond loading a layout
//! description; directories are materialised by [`crate::ErpDb::gen_paths`].

use crate::constants::{COUNTS_DIR_NAME, DATA_DIR_NAME, FIGURES_DIR_NAME, WORDS_DIR_NAME};
use crate::{DbError, DbResult};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// Logical name of a managed path.
///
/// The name is trimmed on construction and must be non-empty. It must not contain path
/// separators, so it can never be confused with a directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathName(String);

impl PathName {
    pub fn new(input: impl AsRef<str>) -> DbResult<Self> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(DbError::InvalidLayout("path name cannot be empty".into()));
        }
        if trimmed.contains(['/', '\\']) {
            return Err(DbError::InvalidLayout(format!(
                "path name {trimmed:?} must not contain path separators"
            )));
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PathName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PathName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> serde::Deserialize<'de> for PathName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PathName::new(&s).map_err(serde::de::Error::custom)
    }
}

/// One managed directory: a logical name and its location relative to the base directory.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct PathEntry {
    pub name: PathName,
    pub dir: PathBuf,
}

impl PathEntry {
    pub fn new(name: impl AsRef<str>, dir: impl Into<PathBuf>) -> DbResult<Self> {
        Ok(Self {
            name: PathName::new(name)?,
            dir: dir.into(),
        })
    }
}

/// Ordered set of managed directories with unique names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathLayout {
    paths: Vec<PathEntry>,
}

/// On-disk shape of a layout file, validated before it becomes a [`PathLayout`].
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct LayoutFile {
    paths: Vec<PathEntry>,
}

impl PathLayout {
    /// Build a layout from explicit entries.
    ///
    /// # Errors
    ///
    /// Returns `DbError::InvalidLayout` if the layout is empty, a name appears twice, or a
    /// directory is absolute, empty, or climbs out of the base with `..`.
    pub fn new(paths: Vec<PathEntry>) -> DbResult<Self> {
        if paths.is_empty() {
            return Err(DbError::InvalidLayout(
                "layout must contain at least one path".into(),
            ));
        }

        let mut seen = HashSet::new();
        for entry in &paths {
            if !seen.insert(entry.name.as_str()) {
                return Err(DbError::InvalidLayout(format!(
                    "duplicate path name {:?}",
                    entry.name.as_str()
                )));
            }
            validate_relative_dir(&entry.name, &entry.dir)?;
        }

        Ok(Self { paths })
    }

    /// Parse and validate a layout from YAML text.
    pub fn from_yaml_str(yaml: &str) -> DbResult<Self> {
        let file: LayoutFile =
            serde_yaml::from_str(yaml).map_err(DbError::LayoutDeserialization)?;
        Self::new(file.paths)
    }

    /// Read, parse and validate a layout file.
    pub fn from_file(path: &Path) -> DbResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(DbError::LayoutRead)?;
        Self::from_yaml_str(&contents)
    }

    pub fn entries(&self) -> &[PathEntry] {
        &self.paths
    }

    pub fn get(&self, name: &str) -> Option<&PathEntry> {
        self.paths.iter().find(|entry| entry.name.as_str() == name)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl Default for PathLayout {
    /// Data and figure folders used by the research project.
    fn default() -> Self {
        let data = PathBuf::from(DATA_DIR_NAME);
        let paths = vec![
            ("data", data.clone()),
            ("counts", data.join(COUNTS_DIR_NAME)),
            ("words", data.join(WORDS_DIR_NAME)),
            ("figures", PathBuf::from(FIGURES_DIR_NAME)),
        ]
        .into_iter()
        .map(|(name, dir)| PathEntry {
            name: PathName(name.to_owned()),
            dir,
        })
        .collect();

        Self { paths }
    }
}

fn validate_relative_dir(name: &PathName, dir: &Path) -> DbResult<()> {
    let mut normal_components = 0usize;
    for component in dir.components() {
        match component {
            Component::Normal(_) => normal_components += 1,
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(DbError::InvalidLayout(format!(
                    "directory for {name:?} must not contain '..'"
                )));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(DbError::InvalidLayout(format!(
                    "directory for {name:?} must be relative to the base directory"
                )));
            }
        }
    }

    if normal_components == 0 {
        return Err(DbError::InvalidLayout(format!(
            "directory for {name:?} cannot be empty"
        )));
    }

    Ok(())
}
