use std::path::Path;
use thiserror::Error;

/// CLI failures, classified by exit code: 1 for program/ruleset
/// problems, 2 for I/O.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Parse(String),
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        CliError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Parse(_) => 1,
            CliError::Io { .. } => 2,
        }
    }
}
