use thiserror::Error;

/// Engine errors.
///
/// Bad per-item data (an unparseable recurrence rule) is not an error:
/// the item is excluded from expansion and the caller may log it. Only
/// caller programming mistakes surface here.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;
