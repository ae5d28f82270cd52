use thiserror::Error;

/// Errors raised while building an Eve schema from example data.
///
/// Every variant aborts the whole inference: no partial schema is returned.
#[derive(Error, Debug)]
pub enum GenieError {
    /// The top-level input is not JSON text or a mapping, or no data was supplied at all.
    #[error("Input is not a string or mapping: {0}")]
    InputType(String),
    /// An example value has a runtime kind the inferrer does not accept.
    #[error(
        "Value types must be string, boolean, integer, float, dict, list or null; found {0}"
    )]
    TypeClassification(String),
    #[error("Maximum nesting depth exceeded: {depth} > {max}")]
    MaxDepthExceeded { depth: usize, max: usize },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GenieError>;
