use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use erpsc_core::{DbConfig, ErpDb};

/// Main entry point for the ERPSC project bootstrap
///
/// Resolves the project base directory and path layout, creates every managed directory and
/// logs the resulting tree.
///
/// # Environment Variables
/// - `ERPSC_PROJECT_DIR`: project base directory (default: nearest ancestor of the working
///   directory holding `erpsc.yaml`, else `./erpsc_project`)
/// - `ERPSC_LAYOUT_FILE`: YAML layout file (default: `<base>/erpsc.yaml` if present, else the
///   built-in layout)
/// - `RUST_LOG`: log filter (default directive: `erpsc=info`)
///
/// # Returns
/// * `Ok(())` - If every directory exists afterwards
/// * `Err(anyhow::Error)` - If configuration or directory creation fails
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("erpsc=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_override = env_path("ERPSC_PROJECT_DIR");
    let layout_override = env_path("ERPSC_LAYOUT_FILE");

    let config = DbConfig::resolve(base_override, layout_override)?;
    tracing::info!("++ Using ERPSC project at {}", config.base_dir().display());

    let db = ErpDb::with_config(config, true)?;
    for (name, path) in db.managed_paths() {
        if let Some(path) = path {
            tracing::info!("{name}: {}", path.display());
        }
    }

    let tree = db.check_structure()?;
    tracing::info!("project structure:\n{tree}");

    Ok(())
}

/// Read a non-empty path from the environment.
fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}
