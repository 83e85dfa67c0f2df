use thiserror::Error;

/// Failure modes of the lookup-and-log pipeline. Quota and ledger
/// state only mutate after a successful upstream response, so every
/// variant here implies the core state is untouched unless the
/// message says otherwise.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("network failure: {0}")]
    NetworkFailure(String),

    /// The governor denied the call before any network attempt.
    #[error("daily lookup quota exhausted")]
    QuotaExceeded,

    #[error("nutrition service error: {0}")]
    UpstreamServerError(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Upstream responded but produced no usable nutrition data.
    #[error("no nutrition data found")]
    NoDataFound,

    #[error(transparent)]
    Unknown(#[from] anyhow::Error),
}

pub type LookupResult<T> = Result<T, LookupError>;
