//! Report output
//!
//! Writes the anonymized discussions of a run to a single report file.

pub mod writer;

pub use writer::{render_json, render_text, ReportWriter};
