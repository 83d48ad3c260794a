//! Integration test suite for gateway-assess
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **assess_command**: `assess` end to end through the binary
//! - **compare_command**: `compare` through the binary
//! - **management_client**: HTTP behavior of the management client against a mock server
//! - **validate_export**: Library-level orchestration with a scripted platform

mod assess_command;
mod common;
mod compare_command;
mod management_client;
mod validate_export;
