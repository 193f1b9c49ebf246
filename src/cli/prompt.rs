//! Interactive prompts
//!
//! Asks for whatever the command line, configuration and environment left
//! unset. Reading is generic over [`BufRead`] and [`Write`] so the prompts can
//! be driven from byte buffers in tests.

use crate::config::is_http_url;
use crate::domain::{InputError, Result};
use std::io::{BufRead, Write};

/// Line-oriented prompter
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Create a prompter over an input and output stream
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask for the MoodleSession cookie value
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Empty`] if the answer is blank.
    pub fn session_cookie(&mut self) -> Result<String> {
        let value = self.ask("Enter your MoodleSession cookie value: ", "MoodleSession cookie")?;
        if value.is_empty() {
            return Err(InputError::Empty("MoodleSession cookie".to_string()).into());
        }
        Ok(value)
    }

    /// Ask for the name of the tracked author
    ///
    /// The name is taken verbatim apart from the line ending, so surrounding
    /// spaces stay significant for matching.
    pub fn tracked_author(&mut self) -> Result<String> {
        let name = self.ask_raw(
            "Enter your name exactly as it appears on the forum: ",
            "tracked author",
        )?;
        if name.is_empty() {
            tracing::warn!("No tracked author given, every post will be attributed to Developer");
        }
        Ok(name)
    }

    /// Ask for forum URLs until an empty line
    ///
    /// Answers that are not http(s) URLs are reported and asked again. End of
    /// input ends the list like an empty line.
    pub fn forum_urls(&mut self) -> Result<Vec<String>> {
        let mut urls = Vec::new();

        loop {
            write!(
                self.output,
                "Enter the Moodle forum URL (or press Enter to finish): "
            )?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                break;
            };
            let url = line.trim();
            if url.is_empty() {
                break;
            }

            if !is_http_url(url) {
                let error = InputError::InvalidUrl(url.to_string());
                tracing::error!(error = %error, "Rejected forum URL");
                writeln!(self.output, "{error}")?;
                continue;
            }

            urls.push(url.to_string());
        }

        Ok(urls)
    }

    fn ask(&mut self, prompt: &str, field: &str) -> Result<String> {
        Ok(self.ask_raw(prompt, field)?.trim().to_string())
    }

    fn ask_raw(&mut self, prompt: &str, field: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        self.read_line()?
            .ok_or_else(|| InputError::Closed(field.to_string()).into())
    }

    /// Next line without its line ending, `None` at end of input
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }
}
