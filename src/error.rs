use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Convenient alias for results returned by the scoring library.
pub type Result<T> = std::result::Result<T, ToneError>;

/// Broad category of a [`ToneError`], for callers that branch on the cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneErrorKind {
    /// Phrase metadata that cannot be scored (no syllables, blank syllables).
    InvalidPhrase,
    /// Pitch track data that cannot be interpreted.
    InvalidTrack,
    /// Any other precondition violation by the caller.
    InvalidInput,
    /// Unparseable structured data (JSON phrase banks, pitch files).
    Format,
}

/// Lightweight error type shared by the scoring, pitch and phrase modules.
#[derive(Debug, Clone)]
pub struct ToneError {
    kind: ToneErrorKind,
    message: Arc<str>,
}

impl ToneError {
    pub fn new(kind: ToneErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: Arc::from(message.into()),
        }
    }

    pub fn invalid_phrase(message: impl Into<String>) -> Self {
        Self::new(ToneErrorKind::InvalidPhrase, message)
    }

    pub fn invalid_track(message: impl Into<String>) -> Self {
        Self::new(ToneErrorKind::InvalidTrack, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ToneErrorKind::InvalidInput, message)
    }

    pub fn format(context: &str, err: impl Display) -> Self {
        Self::new(ToneErrorKind::Format, format!("{context}: {err}"))
    }

    pub fn kind(&self) -> ToneErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for ToneError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ToneError {}

#[cfg(test)]
mod tests {
    use super::{ToneError, ToneErrorKind};

    #[test]
    fn keeps_kind_and_message() {
        let err = ToneError::invalid_phrase("phrase p009 has no syllables");
        assert_eq!(err.kind(), ToneErrorKind::InvalidPhrase);
        assert_eq!(err.to_string(), "phrase p009 has no syllables");
    }

    #[test]
    fn format_errors_carry_context() {
        let err = ToneError::format("failed to parse phrase bank", "expected value at line 1");
        assert_eq!(err.kind(), ToneErrorKind::Format);
        assert!(err.message().starts_with("failed to parse phrase bank: "));
    }
}
