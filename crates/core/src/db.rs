//! Project database paths.
//!
//! [`ErpDb`] holds the resolved location of every directory in a [`PathLayout`] and creates
//! those directories on demand. An instance is either *uninitialised* (no paths set, nothing
//! touched on disk) or *generated* (every path set and present as a directory).
//! [`ErpDb::gen_paths`] is the only transition between the two.

use crate::config::{self, DbConfig};
use crate::layout::{PathLayout, PathName};
use crate::{DbError, DbResult};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Component, Path, PathBuf};

/// Resolved project directories.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErpDb {
    config: DbConfig,
    paths: BTreeMap<PathName, PathBuf>,
}

impl ErpDb {
    /// Creates an `ErpDb` from the default configuration.
    ///
    /// The base directory and layout are resolved with [`DbConfig::resolve`] and no overrides.
    /// When `auto_gen` is true every managed directory is created before returning.
    ///
    /// # Errors
    ///
    /// Returns `DbError::BaseDirResolution` if the base directory cannot be resolved, or any
    /// error from [`ErpDb::gen_paths`] when `auto_gen` is set.
    pub fn new(auto_gen: bool) -> DbResult<Self> {
        Self::new_in(&config::current_dir()?, auto_gen)
    }

    /// [`ErpDb::new`] with the default configuration resolved against `cwd`.
    pub(crate) fn new_in(cwd: &Path, auto_gen: bool) -> DbResult<Self> {
        Self::with_config(DbConfig::resolve_in(cwd, None, None)?, auto_gen)
    }

    /// Creates an `ErpDb` for an explicit configuration.
    pub fn with_config(config: DbConfig, auto_gen: bool) -> DbResult<Self> {
        let mut db = Self {
            config,
            paths: BTreeMap::new(),
        };
        if auto_gen {
            db.gen_paths()?;
        }
        Ok(db)
    }

    /// Computes every managed path and creates the directories that do not exist yet.
    ///
    /// Directories that already exist are left alone, so calling this repeatedly is safe and
    /// yields the same set of paths. The stored paths are only replaced once every directory
    /// has been created; directories made before a failure are not removed.
    ///
    /// # Errors
    ///
    /// Returns `DbError::DirCreation` if a directory cannot be created, including when a
    /// non-directory already occupies the path.
    pub fn gen_paths(&mut self) -> DbResult<()> {
        let base_dir = self.config.base_dir();
        ensure_dir(base_dir)?;

        let mut paths = BTreeMap::new();
        for entry in self.config.layout().entries() {
            let path = base_dir.join(&entry.dir);
            ensure_dir(&path)?;
            tracing::debug!("path {} -> {}", entry.name, path.display());
            paths.insert(entry.name.clone(), path);
        }

        tracing::info!(
            "generated {} paths under {}",
            paths.len(),
            base_dir.display()
        );
        self.paths = paths;
        Ok(())
    }

    pub fn base_dir(&self) -> &Path {
        self.config.base_dir()
    }

    pub fn layout(&self) -> &PathLayout {
        self.config.layout()
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    /// Whether [`ErpDb::gen_paths`] has completed successfully.
    pub fn is_generated(&self) -> bool {
        !self.paths.is_empty()
    }

    /// Iterates every managed path in layout order.
    ///
    /// The path is `None` until the paths have been generated.
    pub fn managed_paths(&self) -> impl Iterator<Item = (&str, Option<&Path>)> + '_ {
        self.layout().entries().iter().map(|entry| {
            (
                entry.name.as_str(),
                self.paths.get(&entry.name).map(PathBuf::as_path),
            )
        })
    }

    /// Returns the absolute location of a managed directory.
    ///
    /// # Errors
    ///
    /// Returns `DbError::UnknownPath` for names outside the layout and
    /// `DbError::PathsNotGenerated` before [`ErpDb::gen_paths`] has run.
    pub fn path(&self, name: &str) -> DbResult<&Path> {
        let entry = self
            .layout()
            .get(name)
            .ok_or_else(|| DbError::UnknownPath(name.to_owned()))?;
        self.paths
            .get(&entry.name)
            .map(PathBuf::as_path)
            .ok_or(DbError::PathsNotGenerated)
    }

    /// Returns the path of `file_name` inside the managed directory `folder`.
    ///
    /// `file_name` must be a single plain path component; the file does not need to exist.
    pub fn file_path(&self, folder: &str, file_name: &str) -> DbResult<PathBuf> {
        let mut components = Path::new(file_name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.path(folder)?.join(file_name)),
            _ => Err(DbError::InvalidInput(format!(
                "file name {file_name:?} must be a single path component"
            ))),
        }
    }

    /// Lists the regular files in the managed directory `folder`.
    ///
    /// Hidden files (leading `.`) are skipped. With `drop_ext` the final extension is removed
    /// from each name; with `sort` the names are returned in ascending order, otherwise in
    /// directory order.
    pub fn list_files(&self, folder: &str, drop_ext: bool, sort: bool) -> DbResult<Vec<String>> {
        let dir = self.path(folder)?;

        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(DbError::DirRead)? {
            let entry = entry.map_err(DbError::DirRead)?;
            if !entry.file_type().map_err(DbError::DirRead)?.is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            if drop_ext {
                if let Some(stem) = Path::new(&name).file_stem() {
                    files.push(stem.to_string_lossy().into_owned());
                    continue;
                }
            }
            files.push(name);
        }

        if sort {
            files.sort();
        }
        Ok(files)
    }

    /// Renders the directory tree under the base directory.
    ///
    /// Directories are listed before files at each level, both in name order, and hidden
    /// entries are skipped. The rendering is also emitted as a `debug` event.
    pub fn check_structure(&self) -> DbResult<String> {
        let base_dir = self.base_dir();
        let root_name = base_dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| base_dir.display().to_string());

        let mut out = format!("{root_name}/\n");
        render_tree(base_dir, 1, &mut out)?;

        tracing::debug!("project structure:\n{}", out);
        Ok(out)
    }
}

/// Returns `db` unchanged, or a new auto-generated default `ErpDb` when none is given.
pub fn check_db(db: Option<ErpDb>) -> DbResult<ErpDb> {
    match db {
        Some(db) => Ok(db),
        None => ErpDb::new(true),
    }
}

/// [`check_db`] with the default instance resolved against `cwd`.
pub(crate) fn check_db_in(db: Option<ErpDb>, cwd: &Path) -> DbResult<ErpDb> {
    match db {
        Some(db) => Ok(db),
        None => ErpDb::new_in(cwd, true),
    }
}

fn ensure_dir(path: &Path) -> DbResult<()> {
    match fs::create_dir_all(path) {
        Ok(()) => {}
        // Another creator won the race.
        Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => {}
        Err(source) => {
            return Err(DbError::DirCreation {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    if !path.is_dir() {
        return Err(DbError::DirCreation {
            path: path.to_path_buf(),
            source: io::Error::new(
                ErrorKind::AlreadyExists,
                "path exists but is not a directory",
            ),
        });
    }

    Ok(())
}

fn render_tree(dir: &Path, depth: usize, out: &mut String) -> DbResult<()> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in fs::read_dir(dir).map_err(DbError::DirRead)? {
        let entry = entry.map_err(DbError::DirRead)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        if entry.file_type().map_err(DbError::DirRead)?.is_dir() {
            dirs.push((name, entry.path()));
        } else {
            files.push(name);
        }
    }

    dirs.sort();
    files.sort();

    let indent = "    ".repeat(depth);
    for (name, path) in dirs {
        let _ = writeln!(out, "{indent}{name}/");
        render_tree(&path, depth + 1, out)?;
    }
    for name in files {
        let _ = writeln!(out, "{indent}{name}");
    }

    Ok(())
}
