//! The node tree (spec.md §3): the shape an external template evaluator
//! hands the layouter, and that the layouter mutates in place.

use std::fmt;

use layla_font::Pt;
use layla_geometry::{Align, Box as GBox, Dim, Dot, Off};
use layla_mark::Tag;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A node kind. The wire format is a plain string; the closed set named by
/// spec.md §6 gets a variant each, and anything else round-trips through
/// [`Kind::Other`] so an evaluator ahead of this crate's kind list doesn't
/// fail to deserialize (spec.md §7, "Unknown node kind ... layouter
/// ignores").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    Stage,
    Rect,
    Ellipse,
    Box,
    Vbox,
    Hbox,
    Table,
    Page,
    Extra,
    Cover,
    Header,
    Footer,
    Line,
    Text,
    Markup,
    Qrcode,
    Barcode,
    Other(String),
}

impl Kind {
    pub fn as_str(&self) -> &str {
        match self {
            Kind::Stage => "stage",
            Kind::Rect => "rect",
            Kind::Ellipse => "ellipse",
            Kind::Box => "box",
            Kind::Vbox => "vbox",
            Kind::Hbox => "hbox",
            Kind::Table => "table",
            Kind::Page => "page",
            Kind::Extra => "extra",
            Kind::Cover => "cover",
            Kind::Header => "header",
            Kind::Footer => "footer",
            Kind::Line => "line",
            Kind::Text => "text",
            Kind::Markup => "markup",
            Kind::Qrcode => "qrcode",
            Kind::Barcode => "barcode",
            Kind::Other(s) => s,
        }
    }

    /// Whether this kind is registered as list-bearing (a container) rather
    /// than data-bearing, per spec.md §6's closed kind sets.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            Kind::Stage
                | Kind::Rect
                | Kind::Ellipse
                | Kind::Box
                | Kind::Vbox
                | Kind::Hbox
                | Kind::Table
                | Kind::Page
                | Kind::Extra
                | Kind::Cover
                | Kind::Header
                | Kind::Footer
        )
    }
}

impl Default for Kind {
    fn default() -> Self {
        Kind::Stage
    }
}

impl From<&str> for Kind {
    fn from(s: &str) -> Kind {
        match s {
            "stage" => Kind::Stage,
            "rect" => Kind::Rect,
            "ellipse" => Kind::Ellipse,
            "box" => Kind::Box,
            "vbox" => Kind::Vbox,
            "hbox" => Kind::Hbox,
            "table" => Kind::Table,
            "page" => Kind::Page,
            "extra" => Kind::Extra,
            "cover" => Kind::Cover,
            "header" => Kind::Header,
            "footer" => Kind::Footer,
            "line" => Kind::Line,
            "text" => Kind::Text,
            "markup" => Kind::Markup,
            "qrcode" => Kind::Qrcode,
            "barcode" => Kind::Barcode,
            other => Kind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl Serialize for Kind {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Kind {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Ok(Kind::from(s.as_str()))
    }
}

/// Font descriptor (spec.md §3). `style`/`height` are derived by the
/// layouter, not author-supplied, so they never round-trip over the wire
/// (mirrors the original's `json:"-"` tags).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Font {
    pub name: String,
    pub size: f64,
    pub line: Dot,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub style: Tag,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub height: Pt,
}

/// Layout-related node data (spec.md §3's `layout` field).
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NodeLayout {
    pub mar: Option<Off>,
    pub pad: Option<Off>,
    pub rot: i32,
    pub align: Align,
    pub gap: Dot,
    pub sub: Dim,
}

/// Border widths. `w > 0` with all per-side widths zero defaults every side
/// to `w` (spec.md §3).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Border {
    pub w: Dot,
    pub l: Dot,
    pub t: Dot,
    pub r: Dot,
    pub b: Dot,
}

impl Border {
    /// Applies the `w`-with-zero-sides default described in spec.md §3,
    /// falling back to `w` when this border sets nothing at all.
    pub fn resolved(mut self, w: Dot) -> Border {
        if !self.w.is_positive() {
            self.w = w;
        }
        if self.w.is_positive()
            && self.l == Dot::ZERO
            && self.t == Dot::ZERO
            && self.r == Dot::ZERO
            && self.b == Dot::ZERO
        {
            self.l = self.w;
            self.t = self.w;
            self.r = self.w;
            self.b = self.w;
        }
        self
    }
}

/// Table metadata. Repurposed by `line` nodes to carry a dash pattern
/// (spec.md §6); the field is shared across kinds on [`Node`] the same way
/// the original Go `Node` embeds it unconditionally.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Table {
    pub cols: Vec<Dot>,
    pub head: bool,
    pub nobr: bool,
}

/// Barcode/QR encoding metadata (spec.md §3, §6).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Code {
    pub name: String,
    pub human: i32,
    pub wide: Dot,
}

/// A node in the display tree (spec.md §3). `abox` is the author-supplied
/// box; `calc` is the absolute box the layouter computes. The layouter
/// mutates a node's `calc`, `data` (rewrapped text) and `list` (markup span
/// expansion) in place exactly once (spec.md §5).
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Node {
    pub kind: Kind,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub abox: GBox,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub layout: NodeLayout,
    pub font: Option<Font>,
    pub border: Border,
    pub list: Vec<Node>,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub table: Table,
    pub code: Option<Code>,
    pub data: String,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub calc: GBox,
}

impl Node {
    pub fn new(kind: Kind) -> Node {
        Node { kind, ..Node::default() }
    }
}
