//! Error types shared by the parser, variant pipeline, and compositor
//!
//! Errors are split in two tiers. [`UserError`] covers everything a person
//! typing a scene can fix themselves; its message is shown verbatim.
//! Everything else is wrapped by [`RenderError`] as an internal failure that
//! is logged in full and reported as an opaque message.

use thiserror::Error;

/// A problem with the scene text or its variants that the author can fix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum UserError {
    /// A cell names a tile that is neither in the catalog nor synthetic
    #[error("There's no tile called `{0}`.")]
    UnresolvedTile(String),
    /// A variant or flag received the wrong number or kind of arguments
    #[error("{0}")]
    Argument(String),
    /// A value was outside its documented bound
    #[error("{0}")]
    Range(String),
    /// An expected bitmap is not on disk
    #[error("Files for `{tile}` not found. Path: `{path}`")]
    AssetMissing { tile: String, path: String },
    /// Text could not be laid out inside a tile
    #[error("{0}")]
    Layout(String),
}

impl UserError {
    pub fn argument(message: impl Into<String>) -> Self {
        UserError::Argument(message.into())
    }

    pub fn range(message: impl Into<String>) -> Self {
        UserError::Range(message.into())
    }

    pub fn layout(message: impl Into<String>) -> Self {
        UserError::Layout(message.into())
    }
}

/// Any failure of a parse or render call.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RenderError {
    /// User-actionable failure, displayed as-is
    #[error(transparent)]
    User(#[from] UserError),
    /// Reading an asset failed for a reason other than absence
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// An asset exists but could not be decoded
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    /// Encoding the animation failed
    #[error("GIF encoding error: {0}")]
    Gif(#[from] gif::EncodingError),
    /// Another thread panicked while holding the sprite cache
    #[error("sprite cache lock poisoned")]
    CachePoisoned,
}

/// Message shown in place of any internal failure.
pub const INTERNAL_MESSAGE: &str = "An unexpected error occurred while rendering.";

impl RenderError {
    /// Whether this failure should be shown to the scene author verbatim.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, RenderError::User(_))
    }

    /// The message to hand back to the calling layer.
    ///
    /// Internal failures are logged here with their full context, and the
    /// caller only ever sees [`INTERNAL_MESSAGE`] for them.
    pub fn user_message(&self) -> String {
        match self {
            RenderError::User(e) => e.to_string(),
            other => {
                tracing::error!(error = %other, debug = ?other, "internal render failure");
                INTERNAL_MESSAGE.to_string()
            }
        }
    }
}

/// Result type alias for parse and render operations.
pub type Result<T> = std::result::Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_tile_message() {
        let err = UserError::UnresolvedTile("bogus".to_string());
        assert_eq!(err.to_string(), "There's no tile called `bogus`.");
    }

    #[test]
    fn test_user_errors_pass_through_verbatim() {
        let err: RenderError = UserError::range("Meta level can't be greater than 16!").into();
        assert!(err.is_user_facing());
        assert_eq!(err.user_message(), "Meta level can't be greater than 16!");
    }

    #[test]
    fn test_internal_errors_are_opaque() {
        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, "truncated png");
        let err = RenderError::from(io);
        assert!(!err.is_user_facing());
        assert_eq!(err.user_message(), INTERNAL_MESSAGE);
    }

    #[test]
    fn test_asset_missing_names_path() {
        let err = UserError::AssetMissing {
            tile: "wall".to_string(),
            path: "data/sprites/wall_1.png".to_string(),
        };
        assert!(err.to_string().contains("data/sprites/wall_1.png"));
    }
}
