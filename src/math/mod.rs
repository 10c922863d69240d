//! Mathematical utilities for the engine

/// Shannon entropy estimators
pub mod entropy;
