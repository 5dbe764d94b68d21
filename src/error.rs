use panel_sim::EmulateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Cannot decode image: {0}")]
    Decode(String),

    #[error("PNG encode error: {0}")]
    Encode(String),

    #[error("Emulation error: {0}")]
    Emulate(#[from] EmulateError),

    #[error("Unknown {kind}: {name}")]
    UnknownName { kind: &'static str, name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// True when the input itself is unusable, as opposed to a configuration
    /// or environment problem.
    pub fn is_bad_input(&self) -> bool {
        matches!(
            self,
            ConvertError::Decode(_) | ConvertError::Emulate(EmulateError::EmptyImage)
        )
    }
}
