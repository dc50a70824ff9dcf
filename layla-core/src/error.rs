use std::fmt;

use layla_font::FontError;

/// The core's only failure mode (spec.md §7): a geometric precondition
/// violated during measurement, or a font the styler could not resolve.
/// `#[non_exhaustive]` so new causes can be added without a breaking change.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// `measure` was asked to lay a node out into an available width <= 0
    /// (spec.md §4.4, "Failure semantics").
    NoAvailableWidth,
    /// The styler could not resolve a face for a font descriptor.
    Font(FontError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoAvailableWidth => write!(f, "layout always needs available width"),
            Error::Font(e) => write!(f, "font resolution error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Font(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FontError> for Error {
    fn from(e: FontError) -> Self {
        Error::Font(e)
    }
}
