use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CcvError>;

/// Which upstream input a parse failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Churn,
    Complexity,
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Churn      => write!(f, "churn"),
            InputSource::Complexity => write!(f, "complexity"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CcvError {
    /// Invalid risk thresholds or config values. Raised before any input is read.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    #[error("unrecognized plot type \"{value}\" (expected \"commits\" or \"changes\")")]
    UnrecognizedPlotMode { value: String },

    #[error("{}", parse_message(.source_kind, .line, .message))]
    Parse {
        source_kind: InputSource,
        line: Option<usize>,
        message: String,
    },

    #[error("cannot access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn parse_message(source: &InputSource, line: &Option<usize>, message: &str) -> String {
    match line {
        Some(n) => format!("malformed {source} input at line {n}: {message}"),
        None    => format!("malformed {source} input: {message}"),
    }
}

impl CcvError {
    pub fn config(message: impl Into<String>) -> Self {
        CcvError::Configuration { message: message.into() }
    }

    pub fn parse(source_kind: InputSource, line: Option<usize>, message: impl Into<String>) -> Self {
        CcvError::Parse { source_kind, line, message: message.into() }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CcvError::Io { path: path.into(), source }
    }
}
