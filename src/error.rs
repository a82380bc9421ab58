use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Errors surfaced by table construction and query resolution.
///
/// `MalformedLabel` is row-local: the loader drops the offending row and
/// continues. `EmptyTable` and `InvalidQuery` are surfaced to the caller for
/// user-facing messaging; neither is retryable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankError {
    /// The bracket label contains no parseable numeric rank.
    #[error("bracket label '{0}' has no parseable percentile rank")]
    MalformedLabel(String),

    /// No usable rows remain after normalization.
    #[error("reference table has no usable rows")]
    EmptyTable,

    /// The query text is not a non-negative number. Rejected outright,
    /// never coerced to zero.
    #[error("invalid query '{0}': expected a non-negative number")]
    InvalidQuery(String),
}
