use thiserror::Error;

/// Errors that can occur during pathway planning.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum PathwayError {
    /// Every sampled trial came back empty; there is nothing to schedule.
    #[error("no valid schedule could be found")]
    NoValidSchedule,

    /// A score weight strategy name was not in the registry.
    #[error("unknown score weight strategy '{0}'")]
    UnknownScoreStrategy(String),

    /// A duration weight strategy name was not in the registry.
    #[error("unknown duration weight strategy '{0}'")]
    UnknownDurationStrategy(String),

    /// A datetime string could not be parsed.
    #[error("invalid datetime '{0}'")]
    InvalidDatetime(String),
}
