//! Domain types shared across Compliscan.
//!
//! # Error Handling
//!
//! Fallible operations outside the analysis core return [`Result<T, ScanError>`]:
//!
//! ```rust,no_run
//! use compliscan::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = compliscan::config::load_config("compliscan.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod result;

pub use errors::{InsightError, ScanError};
pub use result::Result;
