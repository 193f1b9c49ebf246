//! Domain error types
//!
//! This module defines the error hierarchy for Parley. Failures from the
//! collaborators around the anonymizer (fetching, parsing, user input) each get
//! their own error kind so callers can map them to distinct exit codes.
//! Third-party error types are flattened into messages and never exposed.

use thiserror::Error;

/// Main Parley error type
#[derive(Debug, Error)]
pub enum ParleyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Page fetch errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// HTML parse errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Interactive or command-line input errors
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors raised while fetching a Moodle page
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network or TLS failure before a response was received
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// Server answered with a non-success status
    #[error("Request to {url} returned status {status}")]
    Status { status: u16, url: String },

    /// Server redirected to the login page, the session cookie is invalid or expired
    #[error("Redirected to login page ({0}); the MoodleSession cookie may be invalid or expired")]
    LoginRedirect(String),

    /// URL could not be built or parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Whether the error means every further request will fail too
    pub fn is_session_error(&self) -> bool {
        matches!(self, FetchError::LoginRedirect(_))
    }
}

/// Errors raised while parsing forum markup
#[derive(Debug, Error)]
pub enum ParseError {
    /// A CSS selector could not be compiled
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}

/// Errors raised while reading user input
#[derive(Debug, Error)]
pub enum InputError {
    /// A required value was left empty
    #[error("{0} is required")]
    Empty(String),

    /// A forum URL does not start with http:// or https://
    #[error("Invalid URL '{0}'. Please enter a complete URL starting with http:// or https://")]
    InvalidUrl(String),

    /// Input stream closed before a value was read
    #[error("Input closed while reading {0}")]
    Closed(String),
}

impl From<std::io::Error> for ParleyError {
    fn from(err: std::io::Error) -> Self {
        ParleyError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ParleyError {
    fn from(err: serde_json::Error) -> Self {
        ParleyError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for ParleyError {
    fn from(err: toml::de::Error) -> Self {
        ParleyError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<url::ParseError> for ParleyError {
    fn from(err: url::ParseError) -> Self {
        ParleyError::Fetch(FetchError::InvalidUrl(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parley_error_display() {
        let err = ParleyError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_fetch_error_conversion() {
        let fetch_err = FetchError::Status {
            status: 503,
            url: "https://moodle.example.com/mod/forum/view.php?id=1".to_string(),
        };
        let err: ParleyError = fetch_err.into();
        assert!(matches!(err, ParleyError::Fetch(_)));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_parse_error_conversion() {
        let err: ParleyError = ParseError::Selector {
            selector: "article[".to_string(),
            message: "unexpected end of input".to_string(),
        }
        .into();
        assert!(matches!(err, ParleyError::Parse(_)));
    }

    #[test]
    fn test_input_error_conversion() {
        let err: ParleyError = InputError::Empty("MoodleSession cookie".to_string()).into();
        assert!(matches!(err, ParleyError::Input(_)));
        assert_eq!(err.to_string(), "Input error: MoodleSession cookie is required");
    }

    #[test]
    fn test_login_redirect_is_session_error() {
        assert!(FetchError::LoginRedirect("https://m/login/index.php".to_string()).is_session_error());
        assert!(!FetchError::InvalidUrl("nope".to_string()).is_session_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: ParleyError = io_err.into();
        assert!(matches!(err, ParleyError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: ParleyError = toml_err.into();
        assert!(matches!(err, ParleyError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_url_error_conversion() {
        let url_err = url::Url::parse("not a url").unwrap_err();
        let err: ParleyError = url_err.into();
        assert!(matches!(err, ParleyError::Fetch(FetchError::InvalidUrl(_))));
    }
}
