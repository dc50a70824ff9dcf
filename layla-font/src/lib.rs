//! Font facade: face lookup, glyph advance, kerning and line metrics.
//!
//! Actual font-file parsing (TrueType/OpenType) is an external concern
//! (see `spec.md` §1 "Out of scope"). This crate only defines the
//! [`FaceSource`] trait a collaborator implements to expose glyph metrics,
//! plus the [`FontManager`] that registers named sources and hands out
//! [`Face`] handles scaled to a point size and device DPI.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use layla_geometry::Dot;

/// A typographic point, `1/72` inch. Stored as `f64` for metric precision;
/// converted to [`Dot`] via [`FontManager::pt_to_dot`].
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd)]
pub struct Pt(pub f64);

impl Pt {
    pub fn get(self) -> f64 {
        self.0
    }
}

impl From<f64> for Pt {
    fn from(v: f64) -> Self {
        Pt(v)
    }
}

/// Font-facing error: the only failure mode the facade exposes (spec.md §7,
/// "Font resolution ... surfaced up from the styler; layout run aborts").
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FontError {
    UnknownFont(String),
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontError::UnknownFont(name) => write!(f, "unknown font {name:?}"),
        }
    }
}

impl std::error::Error for FontError {}

/// Glyph metrics for one named font, independent of size where possible.
/// A real implementation wraps a parsed font file (ttf-parser, allsorts,
/// ...); a collaborator registers one per font name with [`FontManager::register`].
pub trait FaceSource: Send + Sync {
    /// Advance width of `r` at `size_pt`, in points. `None` means the font
    /// has no glyph for `r` (the caller falls back to a configured rune).
    fn glyph_advance(&self, size_pt: f64, r: char) -> Option<f64>;

    /// Kerning adjustment between `prev` and `cur` at `size_pt`, in points.
    /// Callers never invoke this for `prev` in `{space, newline}` or absent.
    fn kern(&self, size_pt: f64, prev: char, cur: char) -> f64;

    /// The font's metric line height at `size_pt`, in points.
    fn line_height_pt(&self, size_pt: f64) -> f64;
}

/// A uniform-advance stand-in face, useful for tests and as a default when
/// no real font backend is wired in. Every glyph advances by the same
/// fraction of the em size; no kerning.
#[derive(Debug, Clone, Copy)]
pub struct FixedFaceSource {
    /// Advance as a fraction of `size_pt` (e.g. 0.6 for a typical sans).
    pub advance_em: f64,
    /// Line height as a multiple of `size_pt`.
    pub line_em: f64,
}

impl Default for FixedFaceSource {
    fn default() -> Self {
        FixedFaceSource { advance_em: 0.6, line_em: 1.15 }
    }
}

impl FaceSource for FixedFaceSource {
    fn glyph_advance(&self, size_pt: f64, _r: char) -> Option<f64> {
        Some(size_pt * self.advance_em)
    }

    fn kern(&self, _size_pt: f64, _prev: char, _cur: char) -> f64 {
        0.0
    }

    fn line_height_pt(&self, size_pt: f64) -> f64 {
        size_pt * self.line_em
    }
}

/// Registers named font sources and hands out size-specific [`Face`]
/// handles. A process-wide cache with interior mutability: registration is
/// not safe under concurrent calls, but `face()` is a memoized read safe to
/// call from a single layout thread (spec.md §5).
pub struct FontManager {
    dpi: f32,
    subx: i32,
    suby: i32,
    fallback: char,
    sources: RwLock<HashMap<String, Arc<dyn FaceSource>>>,
}

impl fmt::Debug for FontManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontManager")
            .field("dpi", &self.dpi)
            .field("subx", &self.subx)
            .field("suby", &self.suby)
            .finish()
    }
}

impl FontManager {
    /// `dpi <= 0` defaults to 72 (the original's literal fallback); `subx`/`suby`
    /// `<= 0` default to 2/4.
    pub fn new(dpi: f32, subx: i32, suby: i32) -> Self {
        FontManager {
            dpi: if dpi > 0.0 { dpi } else { 72.0 },
            subx: if subx > 0 { subx } else { 2 },
            suby: if suby > 0 { suby } else { 4 },
            fallback: 'X',
            sources: RwLock::new(HashMap::new()),
        }
    }

    pub fn dpi(&self) -> f32 {
        self.dpi
    }

    pub fn sub_pixels(&self) -> (i32, i32) {
        (self.subx, self.suby)
    }

    /// Rune substituted for a glyph missing from a face.
    pub fn with_fallback(mut self, fallback: char) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn dot_to_pt(&self, dot: Dot) -> Pt {
        Pt(dot.get() as f64 * self.dpi as f64 / (25.4 * 8.0))
    }

    pub fn pt_to_dot(&self, pt: Pt) -> Dot {
        Dot::new((pt.get() * 25.4 * 8.0 / self.dpi as f64) as f32)
    }

    /// Registers `source` under `name`. Re-registering an already-known name
    /// is a no-op (first registration wins, matching `RegisterTTF`).
    pub fn register(&self, name: impl Into<String>, source: Arc<dyn FaceSource>) {
        let name = name.into();
        let mut sources = self.sources.write().expect("font registry lock poisoned");
        sources.entry(name).or_insert(source);
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.sources.read().expect("font registry lock poisoned").contains_key(name)
    }

    /// Looks up a registered source and builds a `Face` scaled to `size` pt.
    pub fn face(&self, name: &str, size: f64) -> Result<Face, FontError> {
        let sources = self.sources.read().expect("font registry lock poisoned");
        let source = sources.get(name).cloned().ok_or_else(|| {
            log::warn!("layla-font: unknown font {name:?} requested at size {size}");
            FontError::UnknownFont(name.to_string())
        })?;
        Ok(Face {
            source,
            size_pt: size,
            dpi: self.dpi,
            subx: self.subx,
            fallback: self.fallback,
            extra: 0.0,
        })
    }
}

/// A face bound to a size and DPI, ready to measure text. `extra` is an
/// additive width applied once per measured run, used to simulate
/// fake-bold (spec.md §4.1).
#[derive(Clone)]
pub struct Face {
    source: Arc<dyn FaceSource>,
    size_pt: f64,
    dpi: f32,
    subx: i32,
    fallback: char,
    pub extra: f64,
}

impl Face {
    fn pt_to_dot(&self, pt: f64) -> Dot {
        Dot::new((pt * 25.4 * 8.0 / self.dpi as f64) as f32).floor_frac(self.subx)
    }

    /// Advance of `r` given the previous rune, in `Dot`, floored per the
    /// manager's sub-pixel-X setting. Kerning is skipped when `prev` is
    /// absent, newline, or space.
    pub fn rune(&self, r: char, prev: Option<char>) -> Dot {
        let mut pt = 0.0;
        if let Some(p) = prev {
            if p != '\n' && p != ' ' {
                pt += self.source.kern(self.size_pt, p, r);
            }
        }
        pt += self
            .source
            .glyph_advance(self.size_pt, r)
            .or_else(|| self.source.glyph_advance(self.size_pt, self.fallback))
            .unwrap_or(0.0);
        self.pt_to_dot(pt)
    }

    /// Sum of `rune()` advances over `s`, returning the width and the last
    /// rune seen (for continuing kerning across a boundary).
    pub fn text_width(&self, s: &str, prev: Option<char>) -> (Dot, Option<char>) {
        let mut w = Dot::ZERO;
        let mut last = prev;
        for r in s.chars() {
            w += self.rune(r, last);
            last = Some(r);
        }
        (w, last)
    }

    pub fn line_metric_pt(&self) -> f64 {
        self.source.line_height_pt(self.size_pt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> FontManager {
        let m = FontManager::new(72.0, 2, 4);
        m.register("sans", Arc::new(FixedFaceSource::default()));
        m
    }

    #[test]
    fn default_dpi_falls_back_to_72() {
        let m = FontManager::new(0.0, 0, 0);
        assert_eq!(m.dpi(), 72.0);
        assert_eq!(m.sub_pixels(), (2, 4));
    }

    #[test]
    fn unknown_font_errors() {
        let m = manager();
        assert!(m.face("nope", 10.0).is_err());
    }

    #[test]
    fn register_is_first_wins() {
        let m = manager();
        m.register("sans", Arc::new(FixedFaceSource { advance_em: 9.0, line_em: 1.0 }));
        let f = m.face("sans", 10.0).unwrap();
        assert!(f.rune('a', None).get() < Dot::new(50.0).get());
    }

    #[test]
    fn kerning_skipped_after_space_and_newline() {
        struct Kerned;
        impl FaceSource for Kerned {
            fn glyph_advance(&self, _s: f64, _r: char) -> Option<f64> {
                Some(10.0)
            }
            fn kern(&self, _s: f64, _p: char, _c: char) -> f64 {
                5.0
            }
            fn line_height_pt(&self, s: f64) -> f64 {
                s
            }
        }
        let m = FontManager::new(72.0, 1, 1);
        m.register("k", Arc::new(Kerned));
        let f = m.face("k", 10.0).unwrap();
        let with_kern = f.rune('b', Some('a'));
        let after_space = f.rune('b', Some(' '));
        let after_nl = f.rune('b', Some('\n'));
        let fresh = f.rune('b', None);
        assert!(with_kern.get() > after_space.get());
        assert_eq!(after_space, fresh);
        assert_eq!(after_nl, fresh);
    }
}
