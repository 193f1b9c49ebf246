// Parley - Moodle forum scraper with author anonymization
// Copyright (c) 2025 Parley Contributors
// Licensed under the MIT License

//! # Parley - Moodle forum scraper with author anonymization
//!
//! Parley downloads every discussion of one or more Moodle forums and writes
//! them to a single report in which authors are reduced to two identities:
//! the tracked author becomes `User`, everyone else becomes `Developer`.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Fetching** forum and discussion pages with a `MoodleSession` cookie
//! - **Parsing** discussion links and posts from Moodle markup
//! - **Anonymizing** post authors with an exact, case-sensitive match
//! - **Writing** text or JSON reports
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface, argument parsing and prompts
//! - [`core`] - Scrape orchestration and report output
//! - [`adapters`] - Moodle HTTP client and markup parser
//! - [`anonymization`] - Author substitution and placeholder statistics
//! - [`domain`] - Posts, discussions and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust
//! use parley::anonymization::anonymize;
//! use parley::domain::ForumPost;
//!
//! let posts = vec![
//!     ForumPost::new("Jane Doe", "Question about lab 1"),
//!     ForumPost::new("Tomas Bañales Gutierrez", "Answer"),
//! ];
//!
//! let anonymized = anonymize(&posts, "Tomas Bañales Gutierrez");
//! assert_eq!(anonymized[0].author, "Developer");
//! assert_eq!(anonymized[1].author, "User");
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`], whose error type
//! [`domain::ParleyError`] separates configuration, fetch, parse and input
//! failures so the CLI can map them to exit codes.

pub mod adapters;
pub mod anonymization;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
