//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Collections and handle types
//! - Cooperative scheduler time
//! - Logging utilities

pub mod collections;
pub mod time;
pub mod logging;
