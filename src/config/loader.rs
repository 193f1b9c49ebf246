//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{OutputFormat, ParleyConfig};
use super::secret::secret_string;
use crate::domain::errors::ParleyError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ParleyConfig
/// 4. Applies environment variable overrides (PARLEY_* prefix and OUT_FILE)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, a referenced environment
/// variable is missing, TOML parsing fails or validation fails.
///
/// # Examples
///
/// ```no_run
/// use parley::config::loader::load_config;
///
/// let config = load_config("parley.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ParleyConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ParleyError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ParleyError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: ParleyConfig = toml::from_str(&contents)
        .map_err(|e| ParleyError::Configuration(format!("Failed to parse TOML: {e}")))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        ParleyError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Loads configuration from `path`, falling back to defaults when the file does not exist
///
/// Environment overrides and validation apply in both cases, so a run without
/// any configuration file still honours `PARLEY_*` variables and `OUT_FILE`.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<ParleyConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(
        path = %path.display(),
        "Configuration file not found, using defaults"
    );

    let mut config = ParleyConfig::default();
    apply_env_overrides(&mut config)?;
    config.validate().map_err(|e| {
        ParleyError::Configuration(format!("Configuration validation failed: {e}"))
    })?;
    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ParleyError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(ParleyError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides
///
/// Variables follow the pattern `PARLEY_<SECTION>_<KEY>`, for example
/// `PARLEY_MOODLE_TIMEOUT_SECONDS`. The session cookie and tracked author use
/// the shorter `PARLEY_MOODLE_SESSION` and `PARLEY_TRACKED_AUTHOR`, and
/// `OUT_FILE` overrides the report file name.
fn apply_env_overrides(config: &mut ParleyConfig) -> Result<()> {
    if let Ok(val) = std::env::var("PARLEY_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Moodle overrides
    if let Ok(val) = std::env::var("PARLEY_MOODLE_SESSION") {
        if !val.is_empty() {
            config.moodle.session = Some(secret_string(val));
        }
    }
    if let Ok(val) = std::env::var("PARLEY_MOODLE_FORUM_URLS") {
        config.moodle.forum_urls = val
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Ok(val) = std::env::var("PARLEY_MOODLE_USER_AGENT") {
        config.moodle.user_agent = val;
    }
    if let Ok(val) = std::env::var("PARLEY_MOODLE_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.moodle.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("PARLEY_MOODLE_REQUEST_DELAY_MS") {
        if let Ok(delay) = val.parse() {
            config.moodle.request_delay_ms = delay;
        }
    }
    if let Ok(val) = std::env::var("PARLEY_MOODLE_MAX_PAGES") {
        if let Ok(pages) = val.parse() {
            config.moodle.max_pages = Some(pages);
        }
    }

    // Anonymization overrides
    if let Ok(val) = std::env::var("PARLEY_TRACKED_AUTHOR") {
        config.anonymization.tracked_author = Some(val);
    }

    // Output overrides
    if let Ok(val) = std::env::var("PARLEY_OUTPUT_DIRECTORY") {
        config.output.directory = val.into();
    }
    if let Ok(val) = std::env::var("OUT_FILE") {
        config.output.file_name = val;
    }
    if let Ok(val) = std::env::var("PARLEY_OUTPUT_FORMAT") {
        config.output.format = val
            .parse::<OutputFormat>()
            .map_err(ParleyError::Configuration)?;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("PARLEY_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("PARLEY_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("PARLEY_LOADER_TEST_VAR", "test_value");
        let input = "session = \"${PARLEY_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "session = \"test_value\"");
        std::env::remove_var("PARLEY_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("PARLEY_LOADER_MISSING_VAR");
        let input = "session = \"${PARLEY_LOADER_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("PARLEY_LOADER_COMMENTED_VAR");
        let input = "# session = \"${PARLEY_LOADER_COMMENTED_VAR}\"\nlog_level = \"info\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, input);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-parley.toml");
        assert!(matches!(result, Err(ParleyError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[moodle]
session = "cookie123"
forum_urls = ["https://aulas.example.edu/mod/forum/view.php?id=10"]
request_delay_ms = 0

[anonymization]
tracked_author = "Tomas Bañales Gutierrez"

[output]
directory = "reports"
file_name = "forum.json"
format = "json"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.moodle.forum_urls.len(), 1);
        assert_eq!(config.moodle.request_delay_ms, 0);
        assert_eq!(
            config.anonymization.tracked_author.as_deref(),
            Some("Tomas Bañales Gutierrez")
        );
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_load_config_invalid_url_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[moodle]\nforum_urls = [\"ftp://example.com\"]\n")
            .unwrap();
        temp_file.flush().unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("validation failed"));
    }

    #[test]
    fn test_load_config_or_default_without_file() {
        let config = load_config_or_default("definitely-missing-parley.toml").unwrap();
        assert_eq!(config.moodle.timeout_seconds, 30);
    }
}
