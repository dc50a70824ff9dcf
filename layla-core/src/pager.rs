//! The pager (spec.md §4.6): splits a measured node tree into a sequence of
//! pages, repeating the table head and re-running the header/footer/cover/
//! extra bands on each one. Only engages automatic page-splitting when the
//! root node's kind is `page`; any other root kind yields a single,
//! unbounded page (spec.md §4.6, "Non-goals").

use layla_geometry::{Box as GBox, Dot, Off, OffOption};

use crate::draw::{collect_copy, flatten_into, Draw, DrawRecord};
use crate::error::Error;
use crate::node::{Kind, Node};

struct Page {
    org: Dot,
    b: GBox,
    res: Vec<Draw>,
}

struct Pager<'a> {
    root: &'a Node,
    extra: Option<&'a Node>,
    cover: Option<&'a Node>,
    header: Option<&'a Node>,
    footer: Option<&'a Node>,
    thead: Vec<&'a Node>,
    pages: Vec<Page>,
}

impl<'a> Pager<'a> {
    fn new(root: &'a Node) -> Self {
        let mut p = Pager {
            root,
            extra: None,
            cover: None,
            header: None,
            footer: None,
            thead: Vec::new(),
            pages: Vec::new(),
        };
        for e in &root.list {
            match e.kind {
                Kind::Extra => p.extra = Some(e),
                Kind::Cover => p.cover = Some(e),
                Kind::Header => p.header = Some(e),
                Kind::Footer => p.footer = Some(e),
                _ => {}
            }
        }
        p.new_page(Dot::ZERO);
        p
    }

    /// Opens a fresh page starting at document-relative offset `org`,
    /// shrinking its content band by the cover/header and footer already
    /// measured, and re-flattening the repeated table head into it.
    fn new_page(&mut self, org: Dot) -> usize {
        log::debug!("layla-core: opening page {} at org={org:?}", self.pages.len() + 1);
        let mut b = self
            .root
            .layout
            .pad
            .inset(GBox { w: self.root.abox.w, h: self.root.abox.h, ..GBox::default() });
        let top = if self.pages.is_empty() { self.cover } else { self.header };
        if let Some(top) = top {
            let h = top.calc.h;
            b.y += h;
            b.h -= h;
        }
        if let Some(footer) = self.footer {
            b.h -= footer.calc.h;
        }
        let mut page = Page { org, b, res: Vec::new() };
        let mut mh = Dot::ZERO;
        for th in self.thead.clone() {
            if th.calc.h > mh {
                mh = th.calc.h;
            }
            let offy = page.b.y - th.calc.y;
            flatten_into(th, "", "", &mut page.res, offy);
        }
        if mh.is_positive() {
            page.b.y += mh;
            page.b.h -= mh;
        }
        self.pages.push(page);
        self.pages.len() - 1
    }

    /// Walks the body of the tree (everything outside extra/cover/header/
    /// footer), queuing each leaf for placement via [`Pager::draw`].
    fn collect(&mut self, n: &'a Node) -> Result<(), Error> {
        match n.kind {
            Kind::Text | Kind::Line | Kind::Qrcode | Kind::Barcode => {
                let rec = collect_copy(n);
                self.draw(rec, n.layout.mar);
            }
            Kind::Rect | Kind::Ellipse => {
                let rec = collect_copy(n);
                self.draw(rec, n.layout.mar);
                self.collect_all(&n.list)?;
            }
            Kind::Table => {
                if self.root.kind == Kind::Page && n.table.nobr && !self.fits(n) {
                    log::debug!("layla-core: nobr table does not fit its page, starting a new one");
                    self.new_page(n.calc.y);
                }
                let repeats_head = n.table.head && self.thead.is_empty();
                if repeats_head {
                    let take = n.table.cols.len().min(n.list.len());
                    log::trace!("layla-core: latching {take} table head row(s) for repeat");
                    self.thead = n.list[..take].iter().collect();
                }
                self.collect_all(&n.list)?;
                if repeats_head {
                    log::trace!("layla-core: unlatching repeated table head");
                    self.thead.clear();
                }
            }
            Kind::Stage | Kind::Box | Kind::Vbox | Kind::Hbox | Kind::Page | Kind::Markup => {
                self.collect_all(&n.list)?;
            }
            Kind::Extra | Kind::Cover | Kind::Header | Kind::Footer => {}
            Kind::Other(ref kind) => {
                log::warn!("layla-core: unknown node kind {kind:?}, ignoring during pagination");
            }
        }
        Ok(())
    }

    fn collect_all(&mut self, ns: &'a [Node]) -> Result<(), Error> {
        for e in ns {
            self.collect(e)?;
        }
        Ok(())
    }

    /// Whether `n` fits in the remaining space of the page it started on,
    /// without advancing. Used to decide if an unbreakable (`nobr`) table
    /// needs to start on a fresh page before its first row is placed.
    fn fits(&self, n: &Node) -> bool {
        for x in self.pages.iter().rev() {
            if x.org > n.calc.y {
                continue;
            }
            let y = n.calc.y - x.org;
            return y + n.calc.h <= x.b.h;
        }
        false
    }

    /// Places `rec` (already positioned in document coordinates) onto the
    /// page whose content band its `calc.y` falls within, splitting or
    /// advancing to a later page when it doesn't fit.
    fn draw(&mut self, rec: DrawRecord, mar: Option<Off>) {
        if self.root.kind != Kind::Page {
            self.pages[0].res.push(Draw::Record(rec));
            return;
        }
        let mut i = self.pages.len();
        while i > 0 {
            i -= 1;
            if self.pages[i].org > rec.calc.y {
                continue;
            }
            let y = rec.calc.y - self.pages[i].org;
            if y + rec.calc.h <= self.pages[i].b.h {
                let mut rec = rec;
                rec.calc.y = self.pages[i].b.y + y;
                self.pages[i].res.push(Draw::Record(rec));
                return;
            }
            if rec.kind == Kind::Text {
                self.draw_text(i, y, rec, mar);
                return;
            }
            let next = i + 1;
            let idx = if next < self.pages.len() { next } else { self.new_page(rec.calc.y) };
            let mut rec = rec;
            rec.calc.y = self.pages[idx].b.y;
            if let Some(m) = mar {
                rec.calc.y += m.t;
            }
            self.pages[idx].res.push(Draw::Record(rec));
            return;
        }
    }

    /// Splits an over-height text record across as many pages as its lines
    /// need, re-deriving each page's line capacity from its content band
    /// height and the text's resolved line height.
    fn draw_text(&mut self, mut i: usize, mut y: Dot, rec: DrawRecord, mar: Option<Off>) {
        let mut txt: Vec<&str> = rec.data.split('\n').collect();
        let lh = rec.font.as_ref().map(|f| f.line).unwrap_or(Dot::ZERO);
        let base_y = rec.calc.y;
        let mut ah = self.pages[i].b.h - y;
        let mut hh = Dot::ZERO;
        let mut j = 0u32;
        loop {
            let mut lc = if lh.is_positive() { (ah.get() / lh.get()) as i64 } else { 0 };
            if lc == 0 && j > 0 {
                lc = 1;
            }
            if lc as usize > txt.len() {
                lc = txt.len() as i64;
            }
            if lc > 0 {
                let lc = lc as usize;
                let mut nn = rec.clone();
                nn.calc.y = self.pages[i].b.y + y;
                let mut padh = Dot::ZERO;
                if let Some(p) = nn.pad {
                    padh = p.t + p.b;
                }
                nn.calc.h = (lh * lc as f32 + padh).ceil();
                hh += nn.calc.h;
                nn.data = txt[..lc].join("\n");
                txt.drain(..lc);
                self.pages[i].res.push(Draw::Record(nn));
            }
            if txt.is_empty() {
                return;
            }
            j += 1;
            let next = i + 1;
            i = if next < self.pages.len() { next } else { self.new_page(base_y + hh) };
            y = Dot::ZERO;
            if let Some(m) = mar {
                y = m.t;
            }
            ah = self.pages[i].b.h;
        }
    }
}

/// Splits the measured tree rooted at `root` into a flat, page-ordered draw
/// list: [`Draw::PageBreak`] between pages, then each page's extra, cover
/// (page 1) or header (later pages), footer, and body content in that
/// order (spec.md §4.6).
pub fn page(root: &Node) -> Result<Vec<Draw>, Error> {
    let mut p = Pager::new(root);
    p.collect(root)?;

    let total = p.pages.len().to_string();
    let mut res = Vec::new();
    for i in 0..p.pages.len() {
        if i > 0 {
            res.push(Draw::PageBreak);
        }
        let page_s = (i + 1).to_string();
        if let Some(extra) = p.extra {
            flatten_into(extra, &page_s, &total, &mut res, Dot::ZERO);
        }
        let top = if i > 0 { p.header } else { p.cover };
        if let Some(top) = top {
            flatten_into(top, &page_s, &total, &mut res, Dot::ZERO);
        }
        if let Some(footer) = p.footer {
            let offy = p.pages[i].b.y + p.pages[i].b.h;
            flatten_into(footer, &page_s, &total, &mut res, offy);
        }
        res.append(&mut p.pages[i].res);
    }
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Font, Table};

    fn page_root(h: f32) -> Node {
        Node { kind: Kind::Page, abox: GBox { w: Dot::new(400.0), h: Dot::new(h), ..GBox::default() }, ..Node::default() }
    }

    fn text(y: f32, h: f32, line: f32, data: &str) -> Node {
        Node {
            kind: Kind::Text,
            calc: GBox { y: Dot::new(y), h: Dot::new(h), ..GBox::default() },
            font: Some(Font { line: Dot::new(line), ..Font::default() }),
            data: data.to_string(),
            ..Node::default()
        }
    }

    #[test]
    fn single_page_document_never_splits() {
        let mut root = page_root(200.0);
        root.calc = root.abox;
        root.list.push(text(0.0, 20.0, 20.0, "hello"));
        let draws = page(&root).unwrap();
        assert_eq!(draws.len(), 1);
        assert!(matches!(draws[0], Draw::Record(_)));
    }

    #[test]
    fn non_page_root_never_inserts_breaks() {
        let mut root = Node { kind: Kind::Stage, abox: GBox { w: Dot::new(400.0), h: Dot::new(50.0), ..GBox::default() }, ..Node::default() };
        root.calc = root.abox;
        root.list.push(text(0.0, 500.0, 20.0, "line1\nline2\nline3\nline4\nline5\nline6\nline7\nline8\nline9\nline10"));
        let draws = page(&root).unwrap();
        assert_eq!(draws.len(), 1);
        assert!(!draws.iter().any(|d| matches!(d, Draw::PageBreak)));
    }

    #[test]
    fn oversized_text_splits_across_pages() {
        let mut root = page_root(100.0);
        root.calc = root.abox;
        let lines: Vec<&str> = vec!["one", "two", "three", "four", "five", "six", "seven", "eight"];
        root.list.push(text(0.0, 400.0, 20.0, &lines.join("\n")));
        let draws = page(&root).unwrap();
        assert!(draws.iter().any(|d| matches!(d, Draw::PageBreak)));
        let records: Vec<_> = draws
            .iter()
            .filter_map(|d| match d {
                Draw::Record(r) if r.kind == Kind::Text => Some(r),
                _ => None,
            })
            .collect();
        assert!(records.len() > 1);
    }

    #[test]
    fn repeated_table_head_appears_on_every_page() {
        let mut root = page_root(120.0);
        root.calc = root.abox;
        let mut head_cell = text(0.0, 15.0, 15.0, "Name");
        head_cell.calc.h = Dot::new(15.0);
        let mut table = Node {
            kind: Kind::Table,
            calc: GBox { y: Dot::ZERO, h: Dot::new(15.0), ..GBox::default() },
            table: Table { cols: vec![Dot::new(400.0)], head: true, ..Table::default() },
            ..Node::default()
        };
        table.list.push(head_cell);
        for i in 0..10 {
            let mut row = text((i + 1) as f32 * 15.0, 15.0, 15.0, "row");
            row.calc.h = Dot::new(15.0);
            table.list.push(row);
        }
        root.list.push(table);
        let draws = page(&root).unwrap();
        let name_count = draws
            .iter()
            .filter(|d| matches!(d, Draw::Record(r) if r.kind == Kind::Text && r.data == "Name"))
            .count();
        assert!(name_count >= 2, "expected the head row repeated on at least two pages, saw {name_count}");
    }
}
