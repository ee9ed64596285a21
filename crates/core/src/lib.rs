//! # ERPSC Core
//!
//! Project database paths for the ERPSC research project.
//!
//! This crate resolves where the project's data and figure directories live and creates them:
//! - [`DbConfig`] resolves the base directory and the [`PathLayout`] once at startup
//! - [`ErpDb`] materialises the layout and answers path lookups
//! - [`check_db`] supplies a default [`ErpDb`] when a caller has none
//!
//! **No data processing**: collecting, counting and plotting belong to the callers that use these
//! directories.
//!
//! ```no_run
//! use erpsc_core::{check_db, ErpDb};
//!
//! # fn main() -> Result<(), erpsc_core::DbError> {
//! let db = ErpDb::new(true)?;
//! let counts = db.path("counts")?;
//! println!("counts live in {}", counts.display());
//!
//! let db = check_db(Some(db))?;
//! # let _ = db;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod db;
pub mod error;
pub mod layout;

pub use config::{resolve_base_dir, DbConfig};
pub use db::{check_db, ErpDb};
pub use error::{DbError, DbResult};
pub use layout::{PathEntry, PathLayout, PathName};
