//! Node model, text shaper, layouter, pager and draw-list emitter for the
//! Layla label/document layout engine.
//!
//! A caller builds a [`Node`] tree (typically by deserializing one, with
//! the `serde` feature on), registers its fonts with a [`FontManager`], and
//! calls [`layout_and_page`] to get back a flat, page-ordered [`Draw`]
//! list ready to hand to a renderer.

mod draw;
mod error;
mod layout;
mod node;
mod pager;
mod shaper;
mod styler;
mod util;

pub use draw::{Draw, DrawRecord};
pub use error::Error;
pub use layout::Layouter;
pub use node::{Border, Code, Font, Kind, Node, NodeLayout, Table};
pub use styler::{FakeBoldStyler, Styler, ZeroStyler};

pub use layla_font::{Face, FaceSource, FixedFaceSource, FontError, FontManager, Pt};
pub use layla_geometry::{Align, Box, Dim, Dot, Off, Pos};
pub use layla_mark::Tag;

/// Measures and positions `node` and every descendant in place, using the
/// zero styler (no fake-bold) and `'m'` for inter-word spacing
/// ([`Layouter`]'s default spacer rune). For a custom styler or spacer
/// rune, build a [`Layouter`] directly.
pub fn layout(manager: &FontManager, node: &mut Node) -> Result<(), Error> {
    Layouter::new(manager, &ZeroStyler).layout(node)
}

/// [`layout`], then splits the tree into a flat, page-ordered draw list
/// via [`Layouter::layout_and_page`].
pub fn layout_and_page(manager: &FontManager, node: &mut Node) -> Result<Vec<Draw>, Error> {
    Layouter::new(manager, &ZeroStyler).layout_and_page(node)
}
