//! Core runtime configuration.
//!
//! A [`DbConfig`] pairs the project base directory with the [`PathLayout`] to materialise under
//! it. It should be resolved once at startup and passed into [`crate::ErpDb`]. This module never
//! reads process-wide environment variables; callers that want environment overrides read them
//! and pass the values in.

use crate::constants::{DEFAULT_PROJECT_DIR, LAYOUT_FILENAME};
use crate::layout::PathLayout;
use crate::{DbError, DbResult};
use std::path::{Path, PathBuf};

/// Base directory and layout for an [`crate::ErpDb`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DbConfig {
    base_dir: PathBuf,
    layout: PathLayout,
}

impl DbConfig {
    /// Create a new `DbConfig`.
    ///
    /// A relative `base_dir` is made absolute against the current directory, and the layout is
    /// re-validated so a config can never carry an invalid layout.
    pub fn new(base_dir: PathBuf, layout: PathLayout) -> DbResult<Self> {
        let cwd = if base_dir.is_absolute() {
            PathBuf::new()
        } else {
            current_dir()?
        };
        Self::new_in(&cwd, base_dir, layout)
    }

    pub(crate) fn new_in(cwd: &Path, base_dir: PathBuf, layout: PathLayout) -> DbResult<Self> {
        if base_dir.as_os_str().is_empty() {
            return Err(DbError::BaseDirResolution(
                "base directory cannot be empty".into(),
            ));
        }
        let base_dir = if base_dir.is_absolute() {
            base_dir
        } else {
            cwd.join(base_dir)
        };
        let layout = PathLayout::new(layout.entries().to_vec())?;

        Ok(Self { base_dir, layout })
    }

    /// Resolve a full configuration from optional overrides.
    ///
    /// The layout comes from `layout_override` when given, otherwise from `erpsc.yaml` in the
    /// resolved base directory when that file exists, otherwise the default layout.
    pub fn resolve(
        base_override: Option<PathBuf>,
        layout_override: Option<PathBuf>,
    ) -> DbResult<Self> {
        Self::resolve_in(&current_dir()?, base_override, layout_override)
    }

    /// [`DbConfig::resolve`] against an explicit working directory.
    pub(crate) fn resolve_in(
        cwd: &Path,
        base_override: Option<PathBuf>,
        layout_override: Option<PathBuf>,
    ) -> DbResult<Self> {
        let base_dir = resolve_base_dir_from(cwd, base_override)?;

        let layout = match layout_override {
            Some(file) => PathLayout::from_file(&file)?,
            None => {
                let marker = base_dir.join(LAYOUT_FILENAME);
                if marker.is_file() {
                    tracing::debug!("loading layout from {}", marker.display());
                    PathLayout::from_file(&marker)?
                } else {
                    PathLayout::default()
                }
            }
        };

        Self::new_in(cwd, base_dir, layout)
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn layout(&self) -> &PathLayout {
        &self.layout
    }
}

/// Resolve the project base directory without reading environment variables.
///
/// If `override_dir` is provided it is made absolute against the current directory and, when it
/// already exists, must be a directory. Otherwise the current directory and its ancestors are
/// searched for an `erpsc.yaml` marker; the first directory containing one wins. Failing that,
/// `erpsc_project/` under the current directory is used.
pub fn resolve_base_dir(override_dir: Option<PathBuf>) -> DbResult<PathBuf> {
    resolve_base_dir_from(&current_dir()?, override_dir)
}

pub(crate) fn current_dir() -> DbResult<PathBuf> {
    std::env::current_dir()
        .map_err(|e| DbError::BaseDirResolution(format!("cannot read current directory: {e}")))
}

pub(crate) fn resolve_base_dir_from(
    cwd: &Path,
    override_dir: Option<PathBuf>,
) -> DbResult<PathBuf> {
    if let Some(dir) = override_dir {
        if dir.as_os_str().is_empty() {
            return Err(DbError::BaseDirResolution(
                "base directory override cannot be empty".into(),
            ));
        }

        let dir = if dir.is_absolute() { dir } else { cwd.join(dir) };
        if dir.exists() && !dir.is_dir() {
            return Err(DbError::BaseDirResolution(format!(
                "base directory override is not a directory: {}",
                dir.display()
            )));
        }
        return Ok(dir);
    }

    for ancestor in cwd.ancestors() {
        if ancestor.join(LAYOUT_FILENAME).is_file() {
            return Ok(ancestor.to_path_buf());
        }
    }

    Ok(cwd.join(DEFAULT_PROJECT_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::PathEntry;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_override_relative_to_cwd() {
        let temp = TempDir::new().unwrap();

        let resolved = resolve_base_dir_from(temp.path(), Some(PathBuf::from("project"))).unwrap();
        assert_eq!(resolved, temp.path().join("project"));

        let absolute = temp.path().join("elsewhere");
        let resolved = resolve_base_dir_from(temp.path(), Some(absolute.clone())).unwrap();
        assert_eq!(resolved, absolute);
    }

    #[test]
    fn test_override_must_not_be_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        fs::write(&file, "not a directory").unwrap();

        let result = resolve_base_dir_from(temp.path(), Some(file));
        assert!(matches!(result, Err(DbError::BaseDirResolution(_))));

        let result = resolve_base_dir_from(temp.path(), Some(PathBuf::new()));
        assert!(matches!(result, Err(DbError::BaseDirResolution(_))));
    }

    #[test]
    fn test_marker_found_in_ancestor() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("analysis").join("notebooks");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join(LAYOUT_FILENAME), "paths: []\n").unwrap();

        let resolved = resolve_base_dir_from(&nested, None).unwrap();
        assert_eq!(resolved, temp.path());
    }

    #[test]
    fn test_default_project_dir_without_marker() {
        let temp = TempDir::new().unwrap();
        let cwd = temp.path().join("analysis").join("notebooks");
        fs::create_dir_all(&cwd).unwrap();

        let resolved = resolve_base_dir_from(&cwd, None).unwrap();
        assert_eq!(resolved, cwd.join(DEFAULT_PROJECT_DIR));

        let config = DbConfig::resolve_in(&cwd, None, None).unwrap();
        assert_eq!(config.base_dir(), cwd.join(DEFAULT_PROJECT_DIR));
        assert_eq!(config.layout(), &PathLayout::default());
    }

    #[test]
    fn test_resolve_reads_marker_layout() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(LAYOUT_FILENAME),
            "paths:\n  - name: logs\n    dir: logs\n",
        )
        .unwrap();

        let config = DbConfig::resolve(Some(temp.path().to_path_buf()), None).unwrap();
        assert_eq!(config.base_dir(), temp.path());
        assert_eq!(config.layout().len(), 1);
        assert!(config.layout().get("logs").is_some());
    }

    #[test]
    fn test_resolve_layout_override_wins() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(LAYOUT_FILENAME),
            "paths:\n  - name: logs\n    dir: logs\n",
        )
        .unwrap();
        let custom = temp.path().join("custom.yaml");
        fs::write(&custom, "paths:\n  - name: cache\n    dir: .cache\n").unwrap();

        let config = DbConfig::resolve(Some(temp.path().to_path_buf()), Some(custom)).unwrap();
        assert!(config.layout().get("cache").is_some());
        assert!(config.layout().get("logs").is_none());
    }

    #[test]
    fn test_resolve_default_layout_without_marker() {
        let temp = TempDir::new().unwrap();
        let config = DbConfig::resolve(Some(temp.path().join("project")), None).unwrap();

        assert_eq!(config.layout(), &PathLayout::default());
        assert!(!temp.path().join("project").exists());
    }

    #[test]
    fn test_new_makes_relative_base_absolute() {
        let temp = TempDir::new().unwrap();

        let config =
            DbConfig::new_in(temp.path(), PathBuf::from("project"), PathLayout::default()).unwrap();
        assert_eq!(config.base_dir(), temp.path().join("project"));

        let config = DbConfig::new(PathBuf::from("project"), PathLayout::default()).unwrap();
        assert!(config.base_dir().is_absolute());
        assert!(config.base_dir().ends_with("project"));
    }

    #[test]
    fn test_new_rejects_empty_base() {
        let layout = PathLayout::new(vec![PathEntry::new("data", "data").unwrap()]).unwrap();
        assert!(matches!(
            DbConfig::new(PathBuf::new(), layout),
            Err(DbError::BaseDirResolution(_))
        ));
    }
}
