//! Text shaper (spec.md §4.3): tokenizes, wraps and measures a text or
//! markup node's content against its resolved available width.

use layla_font::{Face, FontManager};
use layla_geometry::{Align, Box as GBox, Dot, OffOption};
use layla_mark::{El, Tag};

use crate::error::Error;
use crate::node::{Font, Kind, Node};
use crate::styler::Styler;
use crate::util::{clamp, effective_font};

#[derive(Debug, Clone, Default)]
struct Span {
    text: String,
    width: Dot,
    tag: Tag,
}

#[derive(Debug, Clone, Default)]
struct Line {
    spans: Vec<Span>,
    width: Dot,
}

/// A shaper token (spec.md §4.3 glossary): a word, the inter-word space, or
/// a forced break from a newline.
enum Tok {
    Word(String),
    Space,
    Break,
}

fn tokenize(text: &str) -> Vec<Tok> {
    let mut toks: Vec<Tok> = Vec::new();
    let mut word = String::new();
    for c in text.chars() {
        if c == '\n' {
            if !word.is_empty() {
                toks.push(Tok::Word(std::mem::take(&mut word)));
            }
            if matches!(toks.last(), Some(Tok::Space)) {
                toks.pop();
            }
            toks.push(Tok::Break);
        } else if c.is_whitespace() {
            if !word.is_empty() {
                toks.push(Tok::Word(std::mem::take(&mut word)));
            }
            if !matches!(toks.last(), Some(Tok::Space)) {
                toks.push(Tok::Space);
            }
        } else {
            word.push(c);
        }
    }
    if !word.is_empty() {
        toks.push(Tok::Word(word));
    }
    toks
}

/// A word's measured width: the sum of its glyph advances (kerning reset at
/// the word boundary) plus the face's fake-bold `extra`, once per word, then
/// ceiled to a whole dot.
fn span_width(face: &Face, txt: &str) -> Dot {
    let (w, _) = face.text_width(txt, None);
    (w + Dot::new(face.extra as f32)).ceil()
}

/// Splits `txt` into the largest leading prefix whose width fits `mw`,
/// splitting on character boundaries when even the first character alone
/// would exceed `mw` (spec.md §4.3, Case C). Kerning runs across the split
/// word but restarts at the split point (`last = None`), same as a fresh
/// word.
fn split_span(face: &Face, txt: &str, mw: Dot) -> (Dot, String, String) {
    let mut res = Dot::new(face.extra as f32);
    let mut last: Option<char> = None;
    for (i, (byte_i, r)) in txt.char_indices().enumerate() {
        let wr = face.rune(r, last);
        if i > 0 && res + wr > mw {
            return (res, txt[..byte_i].to_string(), txt[byte_i..].to_string());
        }
        res += wr;
        last = Some(r);
    }
    (res, txt.to_string(), String::new())
}

pub(crate) struct Shaper<'a> {
    pub manager: &'a FontManager,
    pub styler: &'a dyn Styler,
    /// The rune measured for inter-word spacing (spec.md §9 leaves the
    /// original's literal choice, a fixed glyph rather than the space
    /// character itself, as an open detail; see DESIGN.md).
    pub spacer: char,
}

impl<'a> Shaper<'a> {
    /// Greedily packs `els` into lines no wider than `max`, one call per
    /// markup element so each can carry its own resolved face.
    fn break_lines(&self, font: &Font, els: &[El], max: Dot) -> Result<Vec<Line>, Error> {
        let mut res = Vec::new();
        let mut cur = Line::default();
        for el in els {
            let face = self.styler.style(self.manager, font, el.tag)?;
            self.feed(&face, el.tag, &el.cont, max, &mut res, &mut cur);
        }
        if !cur.spans.is_empty() {
            res.push(cur);
        }
        Ok(res)
    }

    fn feed(&self, face: &Face, tag: Tag, text: &str, max: Dot, res: &mut Vec<Line>, cur: &mut Line) {
        let mut space = false;
        let sdot = face.rune(self.spacer, None).ceil();
        for tok in tokenize(text) {
            match tok {
                Tok::Break => {
                    res.push(std::mem::take(cur));
                    space = false;
                }
                Tok::Space => {
                    space = true;
                }
                Tok::Word(word) => {
                    let mut txt = word;
                    let mut ww = span_width(face, &txt);
                    let mut ws = Dot::ZERO;
                    if space {
                        ws = sdot;
                        space = false;
                    }
                    let mw = max - cur.width;
                    if ws + ww < mw {
                        if ws.is_positive() {
                            cur.spans.push(Span { text: " ".to_string(), width: ws, tag });
                        }
                        cur.spans.push(Span { text: txt, width: ww, tag });
                        cur.width += ws + ww;
                        continue;
                    }
                    // Soft break at the first hyphen, if it still fits.
                    if let Some(d) = txt.find('-') {
                        if d > 0 {
                            let fst = txt[..=d].to_string();
                            let snd = txt[d + 1..].to_string();
                            let wf = span_width(face, &fst);
                            if ws + wf < mw {
                                if ws.is_positive() {
                                    cur.spans.push(Span { text: " ".to_string(), width: ws, tag });
                                }
                                cur.spans.push(Span { text: fst, width: wf, tag });
                                cur.width += ws + wf;
                                ww = span_width(face, &snd);
                                ws = Dot::ZERO;
                                txt = snd;
                            }
                        }
                    }
                    // The word (or its remainder) is wider than a whole
                    // line: break it character by character.
                    if ww > max {
                        log::debug!("layla-core: token {ww:?} wide exceeds line width {max:?}, splitting by character");
                        let mut i = 0usize;
                        let mut budget = max - cur.width;
                        while ws + ww > budget {
                            if i > 0 && !cur.spans.is_empty() {
                                res.push(std::mem::take(cur));
                            }
                            let (cw, ct, rest) = split_span(face, &txt, budget - ws);
                            cur.width += ws + cw;
                            if ws.is_positive() {
                                cur.spans.push(Span { text: " ".to_string(), width: ws, tag });
                                ws = Dot::ZERO;
                            }
                            cur.spans.push(Span { text: ct, width: cw, tag });
                            ww = span_width(face, &rest);
                            txt = rest;
                            i += 1;
                            budget = max;
                        }
                    }
                    if !cur.spans.is_empty() {
                        res.push(std::mem::take(cur));
                    }
                    *cur = Line { width: ww, spans: vec![Span { text: txt, width: ww, tag }] };
                }
            }
        }
        if space {
            cur.spans.push(Span { text: " ".to_string(), width: sdot, tag });
            cur.width += sdot;
        }
    }

    fn resolve_line_height(&self, of: &mut Font) -> Result<Dot, Error> {
        let face = self.styler.style(self.manager, of, Tag::TEXT)?;
        of.height = layla_font::Pt(face.line_metric_pt());
        if !(of.line.get() > 0.0) {
            of.line = Dot::new(1.2);
        }
        if of.line.get() < 8.0 {
            let metric = self.manager.pt_to_dot(of.height);
            of.line = Dot::new(of.line.get() * metric.get()).ceil();
        }
        Ok(of.line)
    }

    /// Shapes a `text` or `markup` node: wraps its content against the
    /// available width inside `node.calc`, then either rewrites `node.data`
    /// to the wrapped string (`text`) or rebuilds `node.list` as one child
    /// text node per non-space span (`markup`), per spec.md §4.3.
    pub fn layout_text(&self, node: &mut Node, stack: &mut Vec<Option<Font>>) -> Result<(), Error> {
        let markup = node.kind == Kind::Markup;
        let els: Vec<El> = if markup {
            layla_mark::inline(&node.data)
        } else {
            vec![El { tag: Tag::TEXT, cont: node.data.clone(), els: Vec::new() }]
        };
        stack.push(node.font.clone());
        let mut of = effective_font(stack);
        stack.pop();

        let b = node.layout.pad.inset(node.calc);
        let lh = self.resolve_line_height(&mut of)?;
        let lines = self.break_lines(&of, &els, b.w)?;

        if markup {
            node.list = Vec::with_capacity(lines.len());
        }
        let mut buf = String::new();
        let mut y = Dot::ZERO;
        let mut mw = Dot::ZERO;
        for (li, line) in lines.iter().enumerate() {
            let mut bx = b.x;
            match node.layout.align {
                Align::Center => bx += ((b.w - line.width) / 2.0).floor(),
                Align::Right => bx += (b.w - line.width).floor(),
                Align::Left => {}
            }
            if !markup && li > 0 {
                buf.push('\n');
            }
            let mut x = Dot::ZERO;
            for sp in &line.spans {
                if !markup {
                    buf.push_str(&sp.text);
                } else if sp.text != " " {
                    let mut span_font = of.clone();
                    span_font.style = sp.tag;
                    node.list.push(Node {
                        kind: Kind::Text,
                        data: sp.text.clone(),
                        calc: GBox { x: bx + x, y: b.y + y, w: sp.width, h: lh },
                        font: Some(span_font),
                        ..Node::default()
                    });
                }
                if x + sp.width > mw {
                    mw = x + sp.width;
                }
                x += sp.width;
            }
            y += lh;
        }
        if !markup {
            node.data = buf;
        }

        let mut outer = b;
        outer.h = y;
        outer.w = mw;
        let outer = node.layout.pad.outset(outer);
        node.calc.h = clamp(node.calc.h, outer.h);
        if node.abox.w.is_positive() {
            node.calc.w = clamp(node.calc.w, node.abox.w);
        } else {
            node.calc.w = clamp(node.calc.w, outer.w);
        }
        node.font = Some(of);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use layla_font::FixedFaceSource;

    use super::*;
    use crate::node::NodeLayout;
    use crate::styler::ZeroStyler;
    use layla_geometry::Dim;

    fn shaper(manager: &FontManager, styler: &dyn Styler) -> Shaper<'_> {
        Shaper { manager, styler, spacer: ' ' }
    }

    fn manager() -> FontManager {
        let m = FontManager::new(72.0, 1, 1);
        m.register("sans", Arc::new(FixedFaceSource { advance_em: 0.6, line_em: 1.2 }));
        m
    }

    fn text_node(data: &str, w: Dot) -> Node {
        Node {
            kind: Kind::Text,
            abox: GBox { w, ..GBox::default() },
            calc: GBox { w, ..GBox::default() },
            font: Some(Font { name: "sans".into(), size: 10.0, ..Font::default() }),
            data: data.to_string(),
            ..Node::default()
        }
    }

    #[test]
    fn wraps_two_words_that_do_not_both_fit() {
        let man = manager();
        let zero = ZeroStyler;
        let s = shaper(&man, &zero);
        let mut n = text_node("Hello world", Dot::new(100.0));
        let mut stack = vec![];
        s.layout_text(&mut n, &mut stack).unwrap();
        assert_eq!(n.data, "Hello\nworld");
    }

    #[test]
    fn markup_rebuilds_list_skipping_space_spans() {
        let man = manager();
        let styler = crate::styler::FakeBoldStyler;
        let s = shaper(&man, &styler);
        let mut n = Node {
            kind: Kind::Markup,
            abox: GBox { w: Dot::new(360.0), ..GBox::default() },
            calc: GBox { w: Dot::new(360.0), ..GBox::default() },
            layout: NodeLayout { sub: Dim::default(), ..NodeLayout::default() },
            font: Some(Font { name: "sans".into(), size: 10.0, ..Font::default() }),
            data: "Test *Test* Test".to_string(),
            ..Node::default()
        };
        let mut stack = vec![];
        s.layout_text(&mut n, &mut stack).unwrap();
        // Three words, no child nodes created for the in-between spaces.
        assert_eq!(n.list.len(), 3);
        assert_eq!(n.list[1].font.as_ref().unwrap().style, Tag::BOLD);
    }

    #[test]
    fn height_clamps_to_author_supplied_h() {
        let man = manager();
        let zero = ZeroStyler;
        let s = shaper(&man, &zero);
        let mut n = text_node("Hello World", Dot::new(200.0));
        n.calc.h = Dot::new(12.0);
        let mut stack = vec![];
        s.layout_text(&mut n, &mut stack).unwrap();
        assert_eq!(n.calc.h, Dot::new(12.0));
    }

    #[test]
    fn oversized_token_is_split_by_character() {
        let man = manager();
        let zero = ZeroStyler;
        let s = shaper(&man, &zero);
        let mut n = text_node("Tobeornottobe", Dot::new(22.0));
        let mut stack = vec![];
        s.layout_text(&mut n, &mut stack).unwrap();
        assert!(n.data.contains('\n'));
        for line in n.data.split('\n') {
            let (w, _) = man.face("sans", 10.0).unwrap().text_width(line, None);
            assert!(w.get() <= 22.0 + 0.01);
        }
    }
}
