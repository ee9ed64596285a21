//! Constants used throughout the ERPSC core crate.
//!
//! Directory and filename constants for the default project layout live here so the layout
//! stays consistent between the library, its tests and the startup binary.

/// Directory name for collected data.
pub const DATA_DIR_NAME: &str = "2-Data";

/// Directory name, under the data directory, for term co-occurrence counts.
pub const COUNTS_DIR_NAME: &str = "counts";

/// Directory name, under the data directory, for word collection results.
pub const WORDS_DIR_NAME: &str = "words";

/// Directory name for generated figures.
pub const FIGURES_DIR_NAME: &str = "3-Figures";

/// Default project directory, relative to the working directory, when no base is configured
/// and no layout marker is found.
pub const DEFAULT_PROJECT_DIR: &str = "erpsc_project";

/// Filename that marks a project base directory and carries its path layout.
pub const LAYOUT_FILENAME: &str = "erpsc.yaml";
