//! Utility modules for common functionality.
//!
//! This module contains helpers used throughout the application,
//! currently the logging setup.

pub mod logger;
