//! The draw-list emitter (spec.md §4.5): turns a measured node tree into a
//! flat sequence of absolutely-positioned draw records, with explicit page
//! breaks between pages.

use layla_geometry::{Align, Box as GBox, Dot, Off};

use crate::node::{Border, Code, Kind, Node};
use crate::node::Font;

#[cfg(feature = "serde")]
use serde::Serialize;

/// One item of a paged draw list: either a positioned record or a page
/// break, in the order a renderer should consume them.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Draw {
    Record(DrawRecord),
    PageBreak,
}

/// A renderer-ready copy of a node: only the fields a given `kind` actually
/// needs (spec.md §4.5, "Draw record"). `calc` is already page-relative by
/// the time this leaves the pager.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct DrawRecord {
    pub kind: Kind,
    pub calc: GBox,
    pub border: Border,
    pub pad: Option<Off>,
    pub font: Option<Font>,
    pub data: String,
    pub align: Align,
    pub code: Option<Code>,
    pub cols: Vec<Dot>,
    pub mar: Option<Off>,
}

/// Copies the fields a renderer needs out of `node`, per its kind (spec.md
/// §4.5). Containers copy nothing extra; their children are walked
/// separately.
pub(crate) fn collect_copy(node: &Node) -> DrawRecord {
    let mut d = DrawRecord {
        kind: node.kind.clone(),
        calc: node.calc,
        border: node.border,
        pad: node.layout.pad,
        font: None,
        data: String::new(),
        align: Align::default(),
        code: None,
        cols: Vec::new(),
        mar: None,
    };
    match node.kind {
        Kind::Line => {
            d.cols = node.table.cols.clone();
        }
        Kind::Text => {
            d.font = node.font.clone();
            d.data = node.data.clone();
            d.align = node.layout.align;
            d.mar = node.layout.mar;
        }
        Kind::Qrcode | Kind::Barcode => {
            d.code = node.code.clone();
            d.data = node.data.clone();
        }
        _ => {}
    }
    d
}

/// Flattens `node` into `res`, substituting the `µP`/`µT` page-number
/// tokens in text content and shifting every emitted record down by `offy`.
/// Used only for the per-page header/footer/cover/extra/repeated-head
/// passes (spec.md §4.6). Ordinary body text never substitutes these
/// tokens, since at the time it is collected the final page count and
/// number are not yet known.
pub(crate) fn flatten_into(node: &Node, page_s: &str, total_s: &str, res: &mut Vec<Draw>, offy: Dot) {
    match node.kind {
        Kind::Text => {
            let mut d = collect_copy(node);
            d.data = d.data.replace("µP", page_s).replace("µT", total_s);
            d.calc.y += offy;
            res.push(Draw::Record(d));
        }
        Kind::Line | Kind::Qrcode | Kind::Barcode => {
            let mut d = collect_copy(node);
            d.calc.y += offy;
            res.push(Draw::Record(d));
        }
        Kind::Rect | Kind::Ellipse => {
            let mut d = collect_copy(node);
            d.calc.y += offy;
            res.push(Draw::Record(d));
            for e in &node.list {
                flatten_into(e, page_s, total_s, res, offy);
            }
        }
        Kind::Stage
        | Kind::Box
        | Kind::Vbox
        | Kind::Hbox
        | Kind::Table
        | Kind::Page
        | Kind::Extra
        | Kind::Cover
        | Kind::Header
        | Kind::Footer
        | Kind::Markup => {
            for e in &node.list {
                flatten_into(e, page_s, total_s, res, offy);
            }
        }
        Kind::Other(_) => {}
    }
}
