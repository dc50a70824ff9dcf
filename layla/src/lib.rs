//! Layla measures a declarative tree of boxes, text and tables and turns
//! it into an absolutely-positioned, paginated draw list.
//!
//! ```
//! use layla::{layout_and_page, Box, Draw, Dot, FontManager, Kind, Node};
//!
//! let manager = FontManager::new(203.0, 2, 4);
//! // manager.register("sans", my_face_source);
//! let mut root = Node::new(Kind::Stage);
//! root.abox = Box { w: Dot::new(360.0), h: Dot::new(360.0), ..Box::default() };
//! let draws = layout_and_page(&manager, &mut root).unwrap();
//! assert!(draws.iter().all(|d| matches!(d, Draw::Record(_) | Draw::PageBreak)));
//! ```
//!
//! This crate only re-exports [`layla_core`]; the node model, text shaper,
//! layouter, pager and draw-list emitter all live there. `layla-font` and
//! `layla-mark` are re-exported too, for the [`FaceSource`] trait and the
//! [`Tag`] bitflags a caller may need beyond the node model itself.

pub use layla_core::{
    layout, layout_and_page, Align, Border, Box, Code, Dim, Dot, Draw, DrawRecord, Error, Face,
    FakeBoldStyler, FixedFaceSource, Font, FontError, FontManager, Kind, Layouter, Node,
    NodeLayout, Off, Pos, Pt, Styler, Table, Tag, ZeroStyler,
};
pub use layla_font::FaceSource;
pub use layla_mark::El;
