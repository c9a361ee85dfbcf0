use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("primitive index {index} is out of range for a store of {len} primitives")]
    InvalidIndex { index: usize, len: usize },

    #[error("primitive index {0} appears more than once")]
    DuplicateIndex(usize),

    #[error("primitive index {0} is not referenced by the index list")]
    MissingIndex(usize),

    #[error("tree was built over {expected} primitives but the store holds {found}")]
    StoreMismatch { expected: usize, found: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read configuration")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML configuration")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse JSON configuration")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IndexError>;
