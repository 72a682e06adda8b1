use thiserror::Error;

/// Why a catalog payload could not be turned into tracks.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("payload is not valid JSON: {0}")]
    Malformed(String),

    #[error("payload has no `results` array")]
    MissingResults,

    #[error("result {index}: missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("result {index}: field `{field}` is not {expected}")]
    InvalidField {
        index: usize,
        field: &'static str,
        expected: &'static str,
    },
}

impl DecodeError {
    /// Name of the offending field, when the failure is about a single field.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            DecodeError::MissingField { field, .. } | DecodeError::InvalidField { field, .. } => {
                Some(field)
            }
            _ => None,
        }
    }
}

/// Failure of one gateway request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("could not build request: {0}")]
    InvalidQuery(String),

    #[error("network failure: {0}")]
    Network(String),

    #[error("undecodable response: {0}")]
    Decoding(#[from] DecodeError),
}
