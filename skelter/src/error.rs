use thiserror::Error;

#[derive(Debug, Error)]
pub enum SkelterError {
    #[error("malformed matrix: {0}")]
    ParseMatrix(String),

    #[error("invalid argument: {context}")]
    InvalidArgument { context: &'static str },

    #[error("elimination variable {variable} out of range for dimension {dimension}")]
    VariableOutOfRange { variable: usize, dimension: usize },

    #[error("unknown {what}: {value:?}")]
    UnknownName { what: &'static str, value: String },
}
