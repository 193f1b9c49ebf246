//! Domain models and types for Parley.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Forum models** ([`ForumPost`], [`Discussion`])
//! - **Error types** ([`ParleyError`], [`FetchError`], [`ParseError`], [`InputError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, ParleyError>`]:
//!
//! ```rust
//! use parley::domain::{FetchError, ParleyError, Result};
//!
//! fn example() -> Result<()> {
//!     Err(FetchError::LoginRedirect("https://moodle.example.com/login/index.php".into()))?
//! }
//!
//! assert!(matches!(example(), Err(ParleyError::Fetch(_))));
//! ```

pub mod errors;
pub mod post;
pub mod result;

pub use errors::{FetchError, InputError, ParleyError, ParseError};
pub use post::{Discussion, ForumPost};
pub use result::Result;
