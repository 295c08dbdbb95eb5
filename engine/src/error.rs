use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Libloading error: {0}")]
    Libloading(#[from] libloading::Error),
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),
    #[error("Document error: {0}")]
    Document(String),
    #[error("Expression error: {0}")]
    Expression(String),
    #[error("Action step error: {0}")]
    ActionStep(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Plugin error: {0}")]
    Plugin(String),
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl From<Box<dyn std::error::Error>> for EngineError {
    fn from(err: Box<dyn std::error::Error>) -> Self {
        EngineError::Runtime(err.to_string())
    }
}
