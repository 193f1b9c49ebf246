//! Report writer
//!
//! The text report lists each discussion under a banner with its URL,
//! followed by every post:
//!
//! ```text
//! ================================================================================
//! Discussion URL: https://moodle.example.com/mod/forum/discuss.php?d=11
//! ================================================================================
//!
//! Title: Welcome
//! Author: User
//! Date: 2024-03-05T10:12:00-03:00
//! Content:
//! Hello everyone
//!
//! ----------------------------------------
//!
//! ```
//!
//! The JSON report carries the same discussions plus a generation timestamp.
//! Neither format contains the tracked author's real name.

use crate::config::{OutputConfig, OutputFormat};
use crate::domain::{Discussion, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

const BANNER_WIDTH: usize = 80;
const SEPARATOR_WIDTH: usize = 40;

/// Writes scraped discussions to a report file
#[derive(Debug, Clone)]
pub struct ReportWriter {
    path: PathBuf,
    format: OutputFormat,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: DateTime<Utc>,
    tracked_author_present: bool,
    discussions: &'a [Discussion],
}

impl ReportWriter {
    /// Create a writer for the given file and format
    pub fn new(path: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    /// Create a writer from the output configuration
    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(config.path(), config.format)
    }

    /// Destination file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the report, creating the parent directory if needed
    ///
    /// `tracked_author_present` is only used by the JSON format.
    pub fn write(&self, discussions: &[Discussion], tracked_author_present: bool) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let rendered = match self.format {
            OutputFormat::Text => render_text(discussions),
            OutputFormat::Json => render_json(discussions, tracked_author_present)?,
        };
        fs::write(&self.path, rendered)?;

        tracing::info!(
            path = %self.path.display(),
            format = %self.format,
            discussion_count = discussions.len(),
            "Report written"
        );

        Ok(())
    }
}

/// Render discussions in the plain-text report format
pub fn render_text(discussions: &[Discussion]) -> String {
    let banner = "=".repeat(BANNER_WIDTH);
    let separator = "-".repeat(SEPARATOR_WIDTH);
    let mut out = String::new();

    for discussion in discussions {
        out.push_str(&format!(
            "{banner}\nDiscussion URL: {}\n{banner}\n\n",
            discussion.url
        ));

        for post in &discussion.posts {
            out.push_str(&format!(
                "Title: {}\nAuthor: {}\nDate: {}\nContent:\n{}\n",
                post.title, post.author, post.date, post.content
            ));
            out.push_str(&format!("\n{separator}\n\n"));
        }
    }

    out
}

/// Render discussions as a pretty-printed JSON document
pub fn render_json(discussions: &[Discussion], tracked_author_present: bool) -> Result<String> {
    let report = JsonReport {
        generated_at: Utc::now(),
        tracked_author_present,
        discussions,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
