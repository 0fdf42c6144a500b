//! Filter operations
//!
//! This module provides the filters used by the iris pipelines: gaussian and
//! median smoothing, Sobel derivatives and dense 2D correlation.

/// Border extrapolation helpers
pub mod border;

/// Filter kernels
pub mod kernels;

/// Filter operations
mod ops;
pub use ops::*;

/// Separable filter operations
mod separable_filter;
pub use separable_filter::*;
