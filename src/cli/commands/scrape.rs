//! Scrape command implementation
//!
//! This module implements the `scrape` command: it resolves the session
//! cookie, tracked author and forum URLs (flags, configuration, environment,
//! then interactive prompts), runs the scrape and writes the report.
//!
//! The prompts block on stdin, so they run on a blocking thread raced against
//! the shutdown channel: Ctrl+C at a prompt cancels the command straight away.

use crate::anonymization::AuthorAnonymizer;
use crate::cli::prompt::Prompter;
use crate::config::{load_config_or_default, secret_string, OutputFormat, ParleyConfig};
use crate::core::output::ReportWriter;
use crate::core::scrape::{ScrapeCoordinator, ScrapeSummary};
use crate::domain::{InputError, ParleyError, Result};
use crate::log_error_with_context;
use clap::Args;
use secrecy::ExposeSecret;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tokio::sync::watch;
use url::Url;

/// Arguments for the scrape command
#[derive(Args, Debug, Default, Clone)]
pub struct ScrapeArgs {
    /// Forum URL to scrape (repeatable, replaces configured URLs)
    #[arg(short, long = "url", value_name = "URL")]
    pub urls: Vec<String>,

    /// Name of the author whose posts become "User"
    #[arg(short = 'a', long)]
    pub tracked_author: Option<String>,

    /// Report file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report format (text or json)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Fail instead of prompting for missing values
    #[arg(long)]
    pub no_prompt: bool,
}

impl ScrapeArgs {
    /// Execute the scrape command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting scrape command");

        let mut config = match load_config_or_default(config_path) {
            Ok(c) => c,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        self.apply_overrides(&mut config);

        let args = self.clone();
        let prompted = until_shutdown(shutdown_signal.clone(), move || {
            let mut prompter = Prompter::new(std::io::stdin().lock(), std::io::stdout());
            let resolved = args.resolve_inputs(&mut config, &mut prompter);
            (config, resolved)
        })
        .await?;

        let Some((config, resolved)) = prompted else {
            tracing::info!("Shutdown requested while waiting for input");
            println!();
            println!("⚠️  Scrape cancelled before it started. No report written.");
            return Ok(130); // SIGINT exit code (standard Unix convention)
        };
        if let Err(e) = resolved {
            log_error_with_context!(&e, "Missing scrape input");
            eprintln!("{e}");
            return Ok(2);
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let forum_urls = match parse_forum_urls(&config.moodle.forum_urls) {
            Ok(urls) => urls,
            Err(e) => {
                eprintln!("{e}");
                return Ok(2);
            }
        };

        let tracked_author = config
            .anonymization
            .tracked_author
            .clone()
            .unwrap_or_default();
        let anonymizer = AuthorAnonymizer::new(tracked_author);

        let coordinator = match ScrapeCoordinator::from_config(&config, anonymizer, shutdown_signal)
        {
            Ok(c) => c,
            Err(e) => {
                log_error_with_context!(&e, "Failed to create scrape coordinator");
                eprintln!("Failed to initialize scrape: {e}");
                return Ok(2);
            }
        };

        println!("🚀 Scraping {} forum(s)...", forum_urls.len());
        println!();

        let summary = coordinator.run(&forum_urls).await;
        summary.log_summary();

        let mut report_written = false;
        if summary.has_discussions() {
            let writer = ReportWriter::from_config(&config.output);
            if let Err(e) = writer.write(&summary.discussions, summary.stats.tracked_author_seen()) {
                log_error_with_context!(&e, "Failed to write report");
                eprintln!("Failed to write report: {e}");
                return Ok(5); // Fatal error exit code
            }
            println!("💾 Report written to {}", writer.path().display());
            report_written = true;
        }

        print_summary(&summary);

        Ok(exit_code(&summary, report_written))
    }

    /// Apply command-line values over the loaded configuration
    fn apply_overrides(&self, config: &mut ParleyConfig) {
        if !self.urls.is_empty() {
            tracing::info!(count = self.urls.len(), "Overriding forum URLs from CLI");
            config.moodle.forum_urls = self.urls.clone();
        }

        if let Some(author) = &self.tracked_author {
            config.anonymization.tracked_author = Some(author.clone());
        }

        if let Some(path) = &self.output {
            match path.file_name() {
                Some(name) => {
                    config.output.directory = path
                        .parent()
                        .map(PathBuf::from)
                        .unwrap_or_default();
                    config.output.file_name = name.to_string_lossy().into_owned();
                }
                None => config.output.directory = path.clone(),
            }
            tracing::info!(path = %config.output.path().display(), "Overriding output path from CLI");
        }

        if let Some(format) = self.format {
            config.output.format = format;
        }
    }

    /// Prompt for whatever is still missing, or fail under `--no-prompt`
    fn resolve_inputs<R: BufRead, W: Write>(
        &self,
        config: &mut ParleyConfig,
        prompter: &mut Prompter<R, W>,
    ) -> Result<()> {
        let has_session = config
            .moodle
            .session
            .as_ref()
            .is_some_and(|s| !s.expose_secret().is_empty());
        if !has_session {
            self.ensure_prompting_allowed("MoodleSession cookie")?;
            config.moodle.session = Some(secret_string(prompter.session_cookie()?));
        }

        if config.anonymization.tracked_author.is_none() {
            self.ensure_prompting_allowed("Tracked author")?;
            config.anonymization.tracked_author = Some(prompter.tracked_author()?);
        }

        if config.moodle.forum_urls.is_empty() {
            self.ensure_prompting_allowed("At least one forum URL")?;
            config.moodle.forum_urls = prompter.forum_urls()?;
            if config.moodle.forum_urls.is_empty() {
                return Err(InputError::Empty("At least one forum URL".to_string()).into());
            }
        }

        Ok(())
    }

    fn ensure_prompting_allowed(&self, field: &str) -> Result<()> {
        if self.no_prompt {
            return Err(InputError::Empty(field.to_string()).into());
        }
        Ok(())
    }
}

/// Run blocking work until it finishes or shutdown is requested
///
/// Returns `None` when shutdown wins. The blocking thread is left behind, so
/// the caller must not wait for the runtime to drain afterwards.
async fn until_shutdown<T, F>(
    mut shutdown_signal: watch::Receiver<bool>,
    work: F,
) -> anyhow::Result<Option<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let task = tokio::task::spawn_blocking(work);
    let requested = async move {
        shutdown_signal
            .wait_for(|requested| *requested)
            .await
            .map(|_| ())
    };

    tokio::select! {
        joined = task => Ok(Some(joined?)),
        Ok(()) = requested => Ok(None),
    }
}

fn parse_forum_urls(urls: &[String]) -> Result<Vec<Url>> {
    urls.iter()
        .map(|raw| {
            Url::parse(raw).map_err(|_| ParleyError::from(InputError::InvalidUrl(raw.clone())))
        })
        .collect()
}

fn print_summary(summary: &ScrapeSummary) {
    println!();
    println!("📊 Scrape Summary:");
    println!("  Forums: {}", summary.total_forums);
    println!("  Pages: {}", summary.pages_visited);
    println!("  Discussions: {}", summary.total_discussions());
    println!("  Posts: {}", summary.total_posts());
    println!("  Skipped posts: {}", summary.skipped_posts);
    println!(
        "  Tracked author posts: {}",
        summary
            .stats
            .count(crate::anonymization::Placeholder::User)
    );
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if !summary.errors.is_empty() {
        println!("⚠️  Errors encountered:");
        for error in &summary.errors {
            println!("  - {:?}: {}", error.error_type, error.message);
            if let Some(context) = &error.context {
                println!("    Context: {context}");
            }
        }
        println!();
    }

    if !summary.has_discussions() {
        println!("❌ No discussions were scraped. This could mean:");
        println!("  1. The MoodleSession cookie is invalid or expired");
        println!("  2. The URL is not a valid Moodle forum");
        println!("  3. The forum is empty");
        println!("  4. The forum requires additional permissions");
        println!();
    }
}

/// Exit code for a finished run
fn exit_code(summary: &ScrapeSummary, report_written: bool) -> i32 {
    if summary.interrupted {
        if report_written {
            println!("⚠️  Scrape interrupted. Partial results were saved.");
        } else {
            println!("⚠️  Scrape interrupted. No report written.");
        }
        tracing::info!(report_written, "Scrape interrupted by user signal");
        130 // SIGINT exit code (standard Unix convention)
    } else if summary.session_rejected() {
        println!("❌ Session rejected by Moodle. Log in again and copy a fresh MoodleSession cookie.");
        4
    } else if !summary.has_discussions() {
        1
    } else if summary.is_successful() {
        println!("✅ Scrape completed successfully!");
        0
    } else {
        println!("⚠️  Scrape completed with errors");
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scrape::{ScrapeError, ScrapeErrorType};
    use crate::domain::{Discussion, ForumPost};
    use std::io::Cursor;
    use std::sync::mpsc;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_apply_overrides() {
        let args = ScrapeArgs {
            urls: vec!["https://m.example.com/mod/forum/view.php?id=9".to_string()],
            tracked_author: Some("Jane Doe".to_string()),
            output: Some(PathBuf::from("reports/forum.json")),
            format: Some(OutputFormat::Json),
            no_prompt: false,
        };
        let mut config = ParleyConfig::default();
        config.moodle.forum_urls = vec!["https://old.example.com".to_string()];

        args.apply_overrides(&mut config);

        assert_eq!(config.moodle.forum_urls, args.urls);
        assert_eq!(config.anonymization.tracked_author.as_deref(), Some("Jane Doe"));
        assert_eq!(config.output.path(), PathBuf::from("reports/forum.json"));
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_resolve_inputs_prompts_for_missing_values() {
        let args = ScrapeArgs::default();
        let mut config = ParleyConfig::default();
        let mut p = prompter("abc123\nJane Doe\nhttps://m.example.com/mod/forum/view.php?id=1\n\n");

        args.resolve_inputs(&mut config, &mut p).unwrap();

        let session = config.moodle.session.as_ref().unwrap();
        assert_eq!(session.expose_secret().as_ref(), "abc123");
        assert_eq!(config.anonymization.tracked_author.as_deref(), Some("Jane Doe"));
        assert_eq!(config.moodle.forum_urls.len(), 1);
    }

    #[test]
    fn test_resolve_inputs_skips_prompts_when_configured() {
        let args = ScrapeArgs::default();
        let mut config = ParleyConfig::default();
        config.moodle.session = Some(secret_string("abc".to_string()));
        config.anonymization.tracked_author = Some(String::new());
        config.moodle.forum_urls = vec!["https://m.example.com/f".to_string()];
        let mut p = prompter("");

        args.resolve_inputs(&mut config, &mut p).unwrap();
        assert_eq!(config.anonymization.tracked_author.as_deref(), Some(""));
    }

    #[test]
    fn test_resolve_inputs_no_prompt_fails() {
        let args = ScrapeArgs {
            no_prompt: true,
            ..Default::default()
        };
        let mut config = ParleyConfig::default();
        let mut p = prompter("abc123\n");

        let err = args.resolve_inputs(&mut config, &mut p).unwrap_err();
        assert!(matches!(err, ParleyError::Input(InputError::Empty(_))));
    }

    #[test]
    fn test_resolve_inputs_requires_a_url() {
        let args = ScrapeArgs::default();
        let mut config = ParleyConfig::default();
        let mut p = prompter("abc123\nJane Doe\n\n");

        assert!(args.resolve_inputs(&mut config, &mut p).is_err());
    }

    #[test]
    fn test_parse_forum_urls() {
        let urls = parse_forum_urls(&["https://m.example.com/mod/forum/view.php?id=1".to_string()])
            .unwrap();
        assert_eq!(urls[0].host_str(), Some("m.example.com"));

        let err = parse_forum_urls(&["https://".to_string()]).unwrap_err();
        assert!(matches!(err, ParleyError::Input(InputError::InvalidUrl(_))));
    }

    #[test]
    fn test_exit_codes() {
        let mut summary = ScrapeSummary::new();
        assert_eq!(exit_code(&summary, false), 1);

        summary.add_discussion(Discussion::new(
            "https://m/d=1",
            vec![ForumPost::new("User", "x")],
        ));
        assert_eq!(exit_code(&summary, true), 0);

        summary.add_error(ScrapeError::new(ScrapeErrorType::Session, "login"));
        assert_eq!(exit_code(&summary, true), 4);

        summary.interrupted = true;
        assert_eq!(exit_code(&summary, true), 130);
    }

    #[test]
    fn test_interrupted_without_report() {
        let mut summary = ScrapeSummary::new();
        summary.interrupted = true;
        assert_eq!(exit_code(&summary, false), 130);
    }

    #[tokio::test]
    async fn test_until_shutdown_returns_finished_work() {
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let outcome = until_shutdown(shutdown_rx, || 42).await.unwrap();
        assert_eq!(outcome, Some(42));
    }

    #[tokio::test]
    async fn test_until_shutdown_cancels_blocked_input() {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (release_tx, release_rx) = mpsc::channel::<()>();

        // Stands in for a prompt waiting on stdin
        let blocked = until_shutdown(shutdown_rx, move || release_rx.recv().is_ok());
        let interrupt = async {
            tokio::task::yield_now().await;
            shutdown_tx.send(true).unwrap();
        };

        let (outcome, ()) = tokio::join!(blocked, interrupt);
        assert_eq!(outcome.unwrap(), None);

        // Unblock the thread so the test runtime can shut down
        drop(release_tx);
    }

    #[tokio::test]
    async fn test_until_shutdown_already_requested() {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        shutdown_tx.send(true).unwrap();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        let outcome = until_shutdown(shutdown_rx, move || release_rx.recv().is_ok())
            .await
            .unwrap();
        assert_eq!(outcome, None);
        drop(release_tx);
    }
}
