use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FntToolError {
    #[error("Config error in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid field {0:?}, expected key=value")]
    InvalidField(String),

    #[error("{0}")]
    Client(#[from] fnt_client::FntError),
}
