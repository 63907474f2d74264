//! Gateway types module
//!
//! ## Submodules
//! - [`error`]: `ApiError` and the account error to status code mapping
//! - [`response`]: Response envelope and error codes

pub mod error;
pub mod response;

// Re-export commonly used types at module root
pub use error::{ApiError, ApiResult};
pub use response::{ApiResponse, error_codes};
