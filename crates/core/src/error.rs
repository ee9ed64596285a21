#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("could not resolve base directory: {0}")]
    BaseDirResolution(String),
    #[error("invalid path layout: {0}")]
    InvalidLayout(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to read layout file: {0}")]
    LayoutRead(std::io::Error),
    #[error("failed to deserialize layout YAML: {0}")]
    LayoutDeserialization(serde_yaml::Error),
    #[error(
        "failed to create directory (path: {path}): {source}",
        path = path.display()
    )]
    DirCreation {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read directory: {0}")]
    DirRead(std::io::Error),
    #[error("no managed path named {0:?}")]
    UnknownPath(String),
    #[error("paths have not been generated yet")]
    PathsNotGenerated,
}

pub type DbResult<T> = std::result::Result<T, DbError>;
