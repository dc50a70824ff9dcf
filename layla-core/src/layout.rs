//! The layouter (spec.md §4.4): a two-pass measure over the node tree.
//! Available width flows down through `measure`'s `a` parameter; each
//! node's required box (including its own margin) flows back up as the
//! return value, which the caller folds into its own running extent.

use layla_geometry::{Align, Box as GBox, Dot, OffOption};

use crate::draw::Draw;
use crate::error::Error;
use crate::node::{Font, Kind, Node};
use crate::shaper::Shaper;
use crate::styler::Styler;
use crate::util::{clamp, clamp_fill, margin_of};
use layla_font::FontManager;

/// Measures and positions a node tree, then optionally pages it into a flat
/// draw list. Bundles the font manager, the styling policy and the rune
/// measured for inter-word spacing, mirroring the original's `Layouter`.
pub struct Layouter<'a> {
    manager: &'a FontManager,
    styler: &'a dyn Styler,
    spacer: char,
}

impl<'a> Layouter<'a> {
    pub fn new(manager: &'a FontManager, styler: &'a dyn Styler) -> Self {
        Layouter { manager, styler, spacer: 'm' }
    }

    pub fn with_spacer(mut self, spacer: char) -> Self {
        self.spacer = spacer;
        self
    }

    /// Measures and sets `node`'s dimensions and positions, and those of
    /// every descendant, in place.
    pub fn layout(&self, node: &mut Node) -> Result<(), Error> {
        let a = node.abox;
        let mut stack: Vec<Option<Font>> = Vec::new();
        self.measure(node, a, &mut stack)?;
        Ok(())
    }

    /// Lays `node` out, then splits it into a flat, page-ordered draw list.
    pub fn layout_and_page(&self, node: &mut Node) -> Result<Vec<Draw>, Error> {
        self.layout(node)?;
        crate::pager::page(node)
    }

    /// Sets the absolute box `node` occupies within the available bounds
    /// `a` and returns the required area, margin included. `a.h <= 0`
    /// leaves the node's height unbounded (spec.md §4.4).
    fn measure(&self, node: &mut Node, a: GBox, stack: &mut Vec<Option<Font>>) -> Result<GBox, Error> {
        if !a.w.is_positive() {
            return Err(Error::NoAvailableWidth);
        }
        let m = margin_of(node);
        let ab = m.inset(a);
        let mut nb = GBox { x: ab.x, y: ab.y, w: node.abox.w, h: node.abox.h };
        nb.w = clamp_fill(ab.w, nb.w);
        if nb.w < ab.w {
            match node.layout.align {
                Align::Right => nb.x += ab.w - nb.w,
                Align::Center => nb.x += (ab.w - nb.w) / 2.0,
                Align::Left => {}
            }
        }
        nb.h = clamp(ab.h, nb.h);
        node.calc = nb;

        match node.kind {
            Kind::Text | Kind::Markup => {
                let shaper = Shaper { manager: self.manager, styler: self.styler, spacer: self.spacer };
                shaper.layout_text(node, stack)?;
            }
            Kind::Line => {
                node.calc.w = node.abox.w;
            }
            Kind::Qrcode => {
                if node.calc.h == Dot::ZERO || node.calc.w < node.calc.h {
                    node.calc.h = node.calc.w;
                } else if node.calc.h.is_positive() && node.calc.w > node.calc.h {
                    node.calc.w = node.calc.h;
                }
            }
            Kind::Barcode => {}
            Kind::Box | Kind::Rect | Kind::Ellipse => {
                node.calc.h = clamp_fill(ab.h, nb.h);
                self.free_layout(node, stack)?;
            }
            Kind::Extra | Kind::Cover | Kind::Header | Kind::Footer | Kind::Stage => {
                self.free_layout(node, stack)?;
            }
            Kind::Page => {
                node.calc.h = Dot::ZERO;
                self.free_layout(node, stack)?;
            }
            Kind::Vbox => self.vbox_layout(node, stack)?,
            Kind::Hbox => self.hbox_layout(node, stack)?,
            Kind::Table => self.table_layout(node, stack)?,
            Kind::Other(ref kind) => {
                log::warn!("layla-core: unknown node kind {kind:?}, ignoring during layout");
            }
        }
        Ok(m.outset(node.calc))
    }

    /// Absolutely-positioned children (spec.md §6, "free layout"): every
    /// child measures against the same available box: shared origin, no
    /// cursor advance.
    fn free_layout(&self, node: &mut Node, stack: &mut Vec<Option<Font>>) -> Result<(), Error> {
        stack.push(node.font.clone());
        let a = node.layout.pad.inset(node.calc);
        let mut h = Dot::ZERO;
        for e in node.list.iter_mut() {
            let eb = self.measure(e, a, stack)?;
            let y = eb.y + eb.h;
            if y > h {
                h = y;
            }
        }
        if let Some(mar) = node.layout.mar {
            h += mar.b;
        }
        if !node.calc.h.is_positive() {
            node.calc.h = h;
        }
        stack.pop();
        Ok(())
    }

    /// Stripe layout stacking children downward (spec.md §6, "vbox"). Each
    /// child's declared width is capped to the remaining available width
    /// before it measures, and a missing child height is substituted from
    /// `sub.h`.
    fn vbox_layout(&self, node: &mut Node, stack: &mut Vec<Option<Font>>) -> Result<(), Error> {
        stack.push(node.font.clone());
        let mut a = node.layout.pad.inset(node.calc);
        let sub_h = node.layout.sub.h;
        let gap = node.layout.gap;
        let mut h = Dot::ZERO;
        let len = node.list.len();
        for i in 0..len {
            let max = {
                let e = &mut node.list[i];
                if sub_h.is_positive() && !e.abox.h.is_positive() {
                    log::trace!("layla-core: vbox child {i} has no height, filling from sub.h={sub_h:?}");
                    e.abox.h = sub_h;
                }
                let mut max = a.w;
                if let Some(mar) = e.layout.mar {
                    max -= mar.l + mar.r;
                }
                if e.abox.w > max {
                    e.abox.w = max;
                }
                max
            };
            let eb = self.measure(&mut node.list[i], a, stack)?;
            let mut y = eb.h;
            if i + 1 < len {
                y += gap;
            }
            a.y += y;
            a.h -= y;
            h += y;
            let e = &mut node.list[i];
            e.calc.w = if e.abox.w.is_positive() { e.abox.w } else { max };
        }
        node.calc.h = clamp(node.calc.h, h);
        stack.pop();
        Ok(())
    }

    /// Stripe layout flowing children rightward (spec.md §6, "hbox"). Mirror
    /// image of [`Layouter::vbox_layout`]: caps each child's declared height
    /// instead of width, substitutes a missing width with `sub.w`, and
    /// leaves the total width rather than height clamped to the sum of the
    /// children's required extents.
    fn hbox_layout(&self, node: &mut Node, stack: &mut Vec<Option<Font>>) -> Result<(), Error> {
        stack.push(node.font.clone());
        let mut a = node.layout.pad.inset(node.calc);
        let sub_w = node.layout.sub.w;
        let gap = node.layout.gap;
        let mut w = Dot::ZERO;
        let mut h = Dot::ZERO;
        let len = node.list.len();
        for i in 0..len {
            {
                let e = &mut node.list[i];
                if sub_w.is_positive() && !e.abox.w.is_positive() {
                    e.abox.w = sub_w;
                }
                let mut max = a.h;
                if let Some(mar) = e.layout.mar {
                    max -= mar.t + mar.b;
                }
                if e.abox.h > max {
                    e.abox.h = max;
                }
            }
            let eb = self.measure(&mut node.list[i], a, stack)?;
            let mut x = eb.w;
            if i + 1 < len {
                x += gap;
            }
            a.x += x;
            a.w -= x;
            w += x;
            if eb.h > h {
                h = eb.h;
            }
        }
        node.calc.w = clamp(node.calc.w, w);
        stack.pop();
        Ok(())
    }

    /// Grid layout (spec.md §6, "table"): lays children out in row-major
    /// order, `cols.len()` (at least one) per row, each row's height the
    /// tallest cell in it.
    fn table_layout(&self, node: &mut Node, stack: &mut Vec<Option<Font>>) -> Result<(), Error> {
        stack.push(node.font.clone());
        table_cols(node);
        let mut a = node.calc;
        let cols = node.table.cols.clone();
        // An empty column list would spin forever re-measuring row 0; the
        // original assumes callers always supply at least one column.
        let ncols = cols.len().max(1);
        let gap = node.layout.gap;
        let total = node.list.len();
        let mut i = 0;
        while i < total {
            let end = (i + ncols).min(total);
            let mut rw = Dot::ZERO;
            let mut rh = Dot::ZERO;
            for (ci, idx) in (i..end).enumerate() {
                let mut b = a;
                b.x += rw;
                b.w = cols.get(ci).copied().unwrap_or(Dot::ZERO);
                rw += b.w;
                self.measure(&mut node.list[idx], b, stack)?;
                node.list[idx].calc.w = b.w;
                if node.list[idx].calc.h > rh {
                    rh = node.list[idx].calc.h;
                }
            }
            for idx in i..end {
                node.list[idx].calc.h = rh;
            }
            rh += gap;
            a.y += rh;
            a.h -= rh;
            i += ncols;
        }
        if !node.calc.h.is_positive() {
            node.calc.h = clamp(node.calc.h, a.y - node.calc.y);
        }
        stack.pop();
        Ok(())
    }
}

/// Resolves flexible (`<= 0`) column widths to an even share of the space
/// left over by the fixed ones, then shrinks the table's own width to the
/// sum of its columns when that sum undershoots the available width
/// (spec.md §6, "table columns").
fn table_cols(node: &mut Node) {
    let mut aw = node.calc.w;
    let mut nw: i32 = 0;
    for c in &node.table.cols {
        if !c.is_positive() {
            nw += 1;
        } else {
            aw -= *c;
        }
    }
    if nw > 0 {
        let share = (aw / nw).round();
        log::trace!("layla-core: table distributes {nw} flex column(s) at {share:?} each");
        for c in node.table.cols.iter_mut() {
            if !c.is_positive() {
                *c = share;
            }
        }
        aw = Dot::ZERO;
    }
    if aw.is_positive() {
        log::debug!("layla-core: table width shrinks by {aw:?} to match its fixed columns");
        node.calc.w -= aw;
    }
}
