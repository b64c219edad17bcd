#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Model inference failed: {0}")]
    ModelInference(String),

    #[error("Failed to load {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl CoreError {
    /// Build a [`CoreError::Load`] for the given file path.
    pub fn load(path: impl AsRef<std::path::Path>, reason: impl std::fmt::Display) -> Self {
        Self::Load {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }
}
