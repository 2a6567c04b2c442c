//! Result type alias for Compliscan

use super::errors::ScanError;

/// Result type alias for Compliscan operations
///
/// # Examples
///
/// ```
/// use compliscan::domain::result::Result;
/// use compliscan::domain::errors::ScanError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ScanError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ScanError>;
