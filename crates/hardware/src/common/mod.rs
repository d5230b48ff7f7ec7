//! Common types shared across the crate.
//!
//! 1. **Address Types:** The raw address/tag type and shift helpers.
//! 2. **Constants:** The invalid-tag sentinel and default granularities.
//! 3. **Error Handling:** Entry precondition failures and configuration errors.

/// Address type definitions and helpers.
pub mod addr;

/// Common constants used throughout the crate.
pub mod constants;

/// Error types.
pub mod error;

pub use addr::Addr;
pub use constants::MAX_ADDR;
pub use error::{ConfigError, EntryError};
