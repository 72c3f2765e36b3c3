//! Application-wide error types.
//!
//! Library modules use specific error types via `thiserror`, while the
//! CLI layer and `main` use `anyhow` for convenient error propagation.
//!
//! # Design
//!
//! - [`Error`]: Top-level application error enum
//! - Module-specific errors ([`MediaError`], [`CatalogError`], [`CoverError`],
//!   [`LocaleError`], [`TagError`]) for detailed handling
//! - All errors implement `std::error::Error` for compatibility
//!
//! # Example
//!
//! ```ignore
//! use rytmdl::error::{Result, ResultExt};
//!
//! fn prepare(dir: &Path) -> Result<()> {
//!     std::fs::create_dir_all(dir).with_context("creating output directory")?;
//!     Ok(())
//! }
//! ```

use crate::catalog::CatalogError;
use crate::cover::CoverError;
use crate::locale::LocaleError;
use crate::media::MediaError;
use crate::tags::TagError;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level application error.
///
/// Aggregates errors from all subsystems for unified handling.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// URL resolution or audio download error
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// Metadata catalog error
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Cover lookup or download error
    #[error("Cover error: {0}")]
    Cover(#[from] CoverError),

    /// Translation loading error
    #[error("Locale error: {0}")]
    Locale(#[from] LocaleError),

    /// Tag reading/writing error
    #[error("Tag error: {0}")]
    Tag(#[from] TagError),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Add context to an error.
    pub fn context(self, ctx: impl Into<String>) -> Self {
        Self::WithContext {
            context: ctx.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn with_context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(ctx))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn with_context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| Error::Io(e).context(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_error_converts() {
        let err: Error = MediaError::SongUnavailable("private video".to_string()).into();
        let msg = err.to_string();
        assert!(msg.starts_with("Media error"));
        assert!(msg.contains("private video"));
    }

    #[test]
    fn test_error_with_context() {
        let err = Error::from(MediaError::Download("bad value".to_string()))
            .context("while downloading");
        let msg = err.to_string();
        assert!(msg.contains("while downloading"));
        assert!(msg.contains("bad value"));
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let err = result.with_context("creating output directory").unwrap_err();
        assert!(err.to_string().contains("creating output directory"));
    }

    #[test]
    fn test_result_ext() {
        let result: Result<()> = Err(CatalogError::NoMatches.into());
        let with_ctx = result.with_context("additional context");
        assert!(with_ctx.unwrap_err().to_string().contains("additional context"));
    }
}
