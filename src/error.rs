//! Top-level error type and the exit codes the CLI maps it to.

use crate::{artifact::ArtifactError, bytecode::CompileError, runtime::RuntimeError};
use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Wrong number or combination of command-line arguments
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The Brainfuck source could not be opened or read
    #[error("cannot read source '{}': {source}", .path.display())]
    SourceFileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::InvalidArguments(_) => 1,
            Error::SourceFileNotFound { .. } => 2,
            Error::Compile(_) => 3,
            Error::Artifact(_) => 4,
            Error::Runtime(_) => 5,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::Span;
    use std::path::Path;

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            Error::InvalidArguments("x".into()),
            Error::SourceFileNotFound {
                path: PathBuf::from("a.bf"),
                source: io::Error::from(io::ErrorKind::NotFound),
            },
            Error::Compile(CompileError::UnmatchedOpenBracket {
                span: Span { line: 1, col: 1 },
            }),
            Error::Artifact(ArtifactError::InvalidOutputPath(PathBuf::from("/"))),
            Error::Runtime(RuntimeError::StepLimit(1)),
        ];
        let mut codes: Vec<u8> = errors.iter().map(Error::exit_code).collect();
        assert!(!codes.contains(&0));
        codes.dedup();
        assert_eq!(codes, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_compile_error_is_transparent() {
        let inner = CompileError::UnmatchedCloseBracket {
            span: Span { line: 2, col: 4 },
        };
        let expected = inner.to_string();
        assert_eq!(Error::from(inner).to_string(), expected);
    }

    #[test]
    fn test_source_error_names_path() {
        let err = Error::SourceFileNotFound {
            path: Path::new("missing.bf").to_path_buf(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("missing.bf"));
    }
}
