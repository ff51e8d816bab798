use crate::frontend::lexer::Span;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// A `[` was still open when the source ended
    #[error("compile error: {span}: [ without matching ]\n  hint: add a `]` to close the loop opened here")]
    UnmatchedOpenBracket { span: Span },

    /// A `]` appeared while no loop was open
    #[error("compile error: {span}: ] without matching [\n  hint: remove this `]` or open a loop before it")]
    UnmatchedCloseBracket { span: Span },

    /// The generated program needs at least one cell
    #[error("compile error: memory size must be at least 1 cell")]
    ZeroMemorySize,

    /// Internal compiler error (shouldn't happen in normal use)
    #[error("compile error: internal error: {0}")]
    Internal(String),
}

impl CompileError {
    pub fn internal(msg: impl Into<String>) -> Self {
        CompileError::Internal(msg.into())
    }

    /// Source position the error points at, if any.
    pub fn span(&self) -> Option<Span> {
        match self {
            CompileError::UnmatchedOpenBracket { span }
            | CompileError::UnmatchedCloseBracket { span } => Some(*span),
            CompileError::ZeroMemorySize | CompileError::Internal(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(line: usize, col: usize) -> Span {
        Span { line, col }
    }

    #[test]
    fn test_unmatched_open_display() {
        let err = CompileError::UnmatchedOpenBracket { span: at(3, 7) };

        let msg = err.to_string();
        assert!(msg.contains("3:7"));
        assert!(msg.contains("[ without matching ]"));
        assert!(msg.contains("hint"));
    }

    #[test]
    fn test_unmatched_close_display() {
        let err = CompileError::UnmatchedCloseBracket { span: at(1, 2) };

        let msg = err.to_string();
        assert!(msg.contains("1:2"));
        assert!(msg.contains("] without matching ["));
    }

    #[test]
    fn test_messages_distinguish_missing_open_and_close() {
        let open = CompileError::UnmatchedOpenBracket { span: at(1, 1) }.to_string();
        let close = CompileError::UnmatchedCloseBracket { span: at(1, 1) }.to_string();
        assert_ne!(open, close);
    }

    #[test]
    fn test_internal_error_display() {
        let err = CompileError::internal("label 3 never marked");

        let msg = err.to_string();
        assert!(msg.contains("internal"));
        assert!(msg.contains("label 3 never marked"));
        assert_eq!(err.span(), None);
    }

    #[test]
    fn test_bracket_errors_have_no_source() {
        use std::error::Error;

        let err = CompileError::UnmatchedOpenBracket { span: at(1, 1) };
        assert!(err.source().is_none());
        assert_eq!(err.span(), Some(at(1, 1)));
    }
}
