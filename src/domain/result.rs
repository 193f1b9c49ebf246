//! Result type alias for Parley

use super::errors::ParleyError;

/// Result type alias for Parley operations
///
/// # Examples
///
/// ```
/// use parley::domain::result::Result;
/// use parley::domain::errors::ParleyError;
///
/// fn failing_function() -> Result<()> {
///     Err(ParleyError::Other("boom".to_string()))
/// }
///
/// assert!(failing_function().is_err());
/// ```
pub type Result<T> = std::result::Result<T, ParleyError>;
