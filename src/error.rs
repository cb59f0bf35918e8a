use thiserror::Error;

#[derive(Error, Debug)]
pub enum TodoError {
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("invalid deadline {0:?}, expected YYYY-MM-DD")]
    InvalidDateFormat(String),

    #[error("no task numbered {0:?}")]
    InvalidSelection(String),
}
