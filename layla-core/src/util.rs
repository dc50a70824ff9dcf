//! Small helpers shared between the layouter and the text shaper.

use layla_geometry::{Dot, Off};

use crate::node::{Font, Node};

/// `clampFill(a, c)`: only box-like kinds fill available width (spec.md
/// §4.4).
pub(crate) fn clamp_fill(a: Dot, c: Dot) -> Dot {
    if (a.is_positive() && c > a) || !c.is_positive() {
        a
    } else {
        c
    }
}

/// `clamp(a, c)`: caps `c` to `a` once `a` is set and `c` would exceed it.
pub(crate) fn clamp(a: Dot, c: Dot) -> Dot {
    if a.is_positive() && c > a {
        a
    } else {
        c
    }
}

/// Resolves a node's outer margin: `mar` with `x`/`y` on the author box
/// overriding `l`/`t` when positive (spec.md §4.4).
pub(crate) fn margin_of(node: &Node) -> Off {
    let mut m = node.layout.mar.unwrap_or_default();
    if node.abox.x.is_positive() {
        m.l = node.abox.x;
    }
    if node.abox.y.is_positive() {
        m.t = node.abox.y;
    }
    m
}

/// Resolves the effective font for a text-like node by walking its
/// ancestor stack from the nearest enclosing node outward, taking the
/// first non-empty name, first non-zero size, first non-zero line
/// (spec.md §4.4, "Font inheritance").
pub(crate) fn effective_font(stack: &[Option<Font>]) -> Font {
    let mut f = Font::default();
    for nf in stack.iter().rev() {
        let Some(nf) = nf else { continue };
        if f.name.is_empty() {
            f.name = nf.name.clone();
        }
        if f.size == 0.0 {
            f.size = nf.size;
        }
        if f.line == Dot::ZERO {
            f.line = nf.line;
        }
        if !f.name.is_empty() && f.size != 0.0 && f.line != Dot::ZERO {
            break;
        }
    }
    f
}
