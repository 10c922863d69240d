//! Statistical analysis of the byte window

/// 256-bucket byte histogram with normalization
pub mod histogram;
