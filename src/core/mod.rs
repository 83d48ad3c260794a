//! Core types and error handling.
//!
//! - [`error`] - [`AssessError`], [`ErrorContext`] and [`user_friendly_error`]

pub mod error;

pub use error::{AssessError, ErrorContext, user_friendly_error};
