//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod init;
pub mod scrape;
pub mod validate;
