//! CLI-specific error types with exit codes.
//!
//! This module defines error types specific to the CLI layer,
//! wrapping library errors and providing appropriate exit codes.

use std::fmt;
use tabling::Error as LibError;

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// Invalid command-line arguments.
    InvalidArguments(String),

    /// I/O error.
    Io(std::io::Error),

    /// Timeout waiting for another terminal's lock.
    Timeout,

    /// Data directory not found (and auto-init disabled).
    NoDataDirectory,

    /// Configuration error.
    Config(String),

    /// Semantic failure (e.g., a validation check failed) - exit code 1.
    SemanticFailure(String),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: Semantic failure (conflict, invalid transition, table unavailable)
    /// - 2: Timeout waiting for the database lock
    /// - 3: No data directory found
    /// - 4: Invalid arguments
    /// - 5: I/O error
    /// - 6: Other library error
    /// - 7: Configuration error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::SemanticFailure(_) => 1,
            CliError::Library(lib_err) => match lib_err {
                e if e.is_refusal() => 1,
                LibError::Validation { .. } => 4,
                LibError::Io(_) => 5,
                LibError::Configuration(_) => 7,
                _ => 6,
            },
            CliError::Timeout => 2,
            CliError::NoDataDirectory => 3,
            CliError::InvalidArguments(_) => 4,
            CliError::Io(_) => 5,
            CliError::Config(_) => 7,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Library(e) => write!(f, "{e}"),
            CliError::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            CliError::Io(e) => write!(f, "I/O error: {e}"),
            CliError::Timeout => write!(
                f,
                "Timeout waiting for database lock (another terminal is writing)"
            ),
            CliError::NoDataDirectory => {
                write!(
                    f,
                    "Data directory not found (run `tabling init` or drop --disable-autoinit)"
                )
            }
            CliError::Config(msg) => write!(f, "Configuration error: {msg}"),
            CliError::SemanticFailure(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Library(e) => Some(e),
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        match e {
            LibError::LockTimeout { .. } => CliError::Timeout,
            LibError::DataDirectoryNotFound { .. } => CliError::NoDataDirectory,
            other => CliError::Library(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

impl From<csv::Error> for CliError {
    fn from(e: csv::Error) -> Self {
        CliError::Io(std::io::Error::other(e))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Io(std::io::Error::other(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabling::{ReservationStatus, TableId};

    #[test]
    fn test_refusals_exit_with_one() {
        let errors = [
            LibError::InvalidTransition {
                from: ReservationStatus::Completed,
                to: ReservationStatus::Seated,
            },
            LibError::TableUnavailable {
                table: TableId::try_from(5_u32).unwrap(),
                reason: "another reservation is seated".into(),
            },
            LibError::ReservationConflict {
                details: "table 5 is booked".into(),
            },
        ];
        for err in errors {
            assert_eq!(CliError::from(err).exit_code(), 1);
        }
    }

    #[test]
    fn test_lock_timeout_maps_to_timeout() {
        let err = CliError::from(LibError::LockTimeout { seconds: 5 });
        assert!(matches!(err, CliError::Timeout));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_library_error_codes() {
        let validation = CliError::from(LibError::Validation {
            field: "party_size".into(),
            message: "party size must be at least 1".into(),
        });
        assert_eq!(validation.exit_code(), 4);

        let missing = CliError::from(LibError::NotFound {
            resource: "reservation 9".into(),
        });
        assert_eq!(missing.exit_code(), 6);

        let io = CliError::from(LibError::Io(std::io::Error::other("disk")));
        assert_eq!(io.exit_code(), 5);
    }

    #[test]
    fn test_cli_error_codes() {
        assert_eq!(CliError::NoDataDirectory.exit_code(), 3);
        assert_eq!(CliError::InvalidArguments("x".into()).exit_code(), 4);
        assert_eq!(CliError::Config("x".into()).exit_code(), 7);
        assert_eq!(CliError::SemanticFailure("x".into()).exit_code(), 1);
    }
}
