//! Crate-level error types.

use std::fmt;

use crate::split_reveal::SplitPhase;

/// Errors produced by the segue crate.
#[derive(Debug)]
pub enum SegueError {
    /// The router refused or failed a route push.
    Navigation(String),
    /// A split-reveal phase change that the state machine does not allow.
    IllegalPhase {
        /// Phase the transition was in.
        from: SplitPhase,
        /// Phase that was requested.
        to: SplitPhase,
    },
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Upstream fetch failure in the image passthrough.
    Fetch(String),
}

impl fmt::Display for SegueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Navigation(msg) => write!(f, "navigation error: {msg}"),
            Self::IllegalPhase { from, to } => {
                write!(f, "illegal split phase change: {from:?} -> {to:?}")
            }
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Fetch(msg) => write!(f, "fetch error: {msg}"),
        }
    }
}

impl std::error::Error for SegueError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SegueError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn illegal_phase_names_both_ends() {
        let err = SegueError::IllegalPhase {
            from: SplitPhase::Idle,
            to: SplitPhase::Splitting,
        };
        assert_eq!(
            err.to_string(),
            "illegal split phase change: Idle -> Splitting"
        );
    }

    #[test]
    fn io_error_exposes_source() {
        let err: SegueError =
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("I/O error"));
    }
}
