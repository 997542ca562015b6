use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectError {
    #[error("Failed to read system shells from {path}: {source}")]
    SystemShells {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
