use thiserror::Error;

/// Failure modes of the interaction engine.
///
/// Only index, catalog and config problems are ever returned to a caller.
/// Actuator and sensor failures are degraded in place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("select target {index} is outside 0..{count}")]
    InvalidIndex { index: usize, count: usize },

    #[error("carousel needs at least one item")]
    EmptyCatalog,

    #[error("actuator unavailable: {0}")]
    ActuatorUnavailable(String),

    #[error("orientation sensor unavailable: {0}")]
    SensorUnavailable(String),

    #[error("invalid tuning: {0}")]
    InvalidConfig(String),

    #[error("catalog could not be read: {0}")]
    Catalog(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
