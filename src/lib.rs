//! Incremental decision trees for classification on data streams.
//!
//! [`classifiers::IademTree`] implements IADEM-2 and, when built with an
//! [`classifiers::iadem::AdaptiveConfig`], the drift-aware IADEM-3 variant.

pub mod classifiers;
pub mod core;
pub mod error;
pub mod evaluation;
pub mod streams;
pub mod tasks;
pub mod ui;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
