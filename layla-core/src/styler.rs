//! The styler policy (spec.md §4.1): maps a font descriptor plus an inline
//! markup tag to a concrete [`Face`]. Replaces the original's dynamic
//! dispatch closure with a trait, which is also implemented for any `Fn`
//! matching the signature, so a custom styler is just a closure.

use layla_font::{Face, FontManager};
use layla_mark::Tag;

use crate::error::Error;
use crate::node::Font;

pub trait Styler: Send + Sync {
    fn style(&self, manager: &FontManager, font: &Font, tag: Tag) -> Result<Face, Error>;
}

/// Ignores `tag` entirely: every span of a text node renders in the same
/// face.
#[derive(Debug, Default, Clone, Copy)]
pub struct ZeroStyler;

impl Styler for ZeroStyler {
    fn style(&self, manager: &FontManager, font: &Font, _tag: Tag) -> Result<Face, Error> {
        Ok(manager.face(&font.name, font.size)?)
    }
}

/// Simulates bold by widening each glyph of a `Tag::BOLD` span by one dot
/// rather than switching to a distinct bold face (spec.md §4.1).
#[derive(Debug, Default, Clone, Copy)]
pub struct FakeBoldStyler;

impl Styler for FakeBoldStyler {
    fn style(&self, manager: &FontManager, font: &Font, tag: Tag) -> Result<Face, Error> {
        let mut face = manager.face(&font.name, font.size)?;
        if tag.contains(Tag::BOLD) {
            face.extra = 1.0;
        }
        Ok(face)
    }
}

impl<F> Styler for F
where
    F: Fn(&FontManager, &Font, Tag) -> Result<Face, Error> + Send + Sync,
{
    fn style(&self, manager: &FontManager, font: &Font, tag: Tag) -> Result<Face, Error> {
        (self)(manager, font, tag)
    }
}
