//! Error types for channel construction, control and export

use std::collections::TryReserveError;
use std::fmt;
use std::path::PathBuf;

/// Main error type for all channel operations
#[derive(Debug)]
pub enum ChannelError {
    /// Parameter validation failed
    InvalidParameter {
        /// Parameter that was rejected
        parameter: &'static str,
        /// Offending value, rendered as text
        value: String,
        /// Constraint the value violates
        reason: String,
    },

    /// Inbound control selector has no associated command
    UnknownCommand {
        /// The rejected selector
        selector: i32,
    },

    /// Pattern specification entry could not be parsed
    MalformedPattern {
        /// Index of the entry in the specification
        entry: usize,
        /// Offending token
        token: String,
        /// Description of what's wrong with the token
        reason: &'static str,
    },

    /// Buffer allocation was refused by the allocator
    ///
    /// Raised before any channel state is replaced, so the channel
    /// keeps operating on its previous buffers.
    Allocation {
        /// Buffer that was being allocated
        what: &'static str,
        /// Number of elements requested
        requested: usize,
        /// Underlying reservation error
        source: TryReserveError,
    },

    /// Failed to save a rendered frame to disk
    ImageExport {
        /// Destination of the frame
        path: PathBuf,
        /// Encoder or writer failure
        source: image::ImageError,
    },

    /// Reading the input or writing output failed
    FileSystem {
        /// File or directory being accessed
        path: PathBuf,
        /// Operation name, e.g. `open` or `seek`
        operation: &'static str,
        /// Operating system error
        source: std::io::Error,
    },

    /// External sink refused a flushed frame
    Sink {
        /// Description of the failure
        reason: String,
    },
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::UnknownCommand { selector } => {
                write!(f, "Unknown command selector {selector}")
            }
            Self::MalformedPattern {
                entry,
                token,
                reason,
            } => {
                write!(f, "Malformed pattern entry {entry} at token '{token}': {reason}")
            }
            Self::Allocation {
                what,
                requested,
                source,
            } => {
                write!(
                    f,
                    "Failed to allocate {requested} elements for {what}: {source}"
                )
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::Sink { reason } => write!(f, "Sink rejected frame: {reason}"),
        }
    }
}

impl std::error::Error for ChannelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Allocation { source, .. } => Some(source),
            Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for channel results
pub type Result<T> = std::result::Result<T, ChannelError>;

impl From<std::io::Error> for ChannelError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

/// Build a [`ChannelError::InvalidParameter`] from displayable parts
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> ChannelError {
    ChannelError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a generic I/O error for path handling failures
pub fn io_error(msg: &str) -> ChannelError {
    ChannelError::InvalidParameter {
        parameter: "path",
        value: String::new(),
        reason: msg.to_string(),
    }
}

/// Allocate a vector of `len` copies of `value`, surfacing allocator refusal
///
/// # Errors
///
/// Returns [`ChannelError::Allocation`] if the reservation fails
pub fn try_filled<T: Clone>(len: usize, value: T, what: &'static str) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|source| ChannelError::Allocation {
            what,
            requested: len,
            source,
        })?;
    buffer.resize(len, value);
    Ok(buffer)
}
