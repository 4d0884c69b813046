use thiserror::Error;

use streams_store::StoreError;

/// Failure of a core operation.
///
/// `Input` and `Access` are the caller's fault and map to distinct status
/// codes at the boundary. `Internal` is reserved for infrastructure faults.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Input(String),

    #[error("{0}")]
    Access(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl Error {
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    pub fn access(msg: impl Into<String>) -> Self {
        Self::Access(msg.into())
    }

    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input(_))
    }

    pub fn is_access(&self) -> bool {
        matches!(self, Self::Access(_))
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        Self::Internal(e.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
