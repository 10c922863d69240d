//! Input/output surfaces around the channel

/// Command-line file sensor
pub mod cli;
/// Inbound control command protocol
pub mod command;
/// Engine constants and defaults
pub mod configuration;
/// Error types and allocation helpers
pub mod error;
/// PNG and GIF export
pub mod image;
/// Pattern specification text format
pub mod pattern_spec;
/// Terminal progress display
pub mod progress;
/// Notifications and the external sink
pub mod sink;
