//! Result alias used throughout Codepad.

use crate::error::AppError;

/// Convenience alias for results carrying an [`AppError`].
pub type AppResult<T> = Result<T, AppError>;
