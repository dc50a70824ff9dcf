//! Unit system and box geometry shared across the Layla layout engine.
//!
//! One [`Dot`] is 1/8 mm, the nominal pixel pitch of a 203 DPI thermal
//! printhead. All layout math happens in `Dot` so that the same computed
//! tree can be rendered losslessly at a handful of common print DPIs.

use core::cmp::Ordering;
use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 1/8 mm, ~1/203 inch. Fractional; stored as `f32`.
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Dot(pub f32);

impl Dot {
    pub const ZERO: Dot = Dot(0.0);

    pub fn new(v: f32) -> Self {
        Dot(v)
    }

    pub fn get(self) -> f32 {
        self.0
    }

    /// Round to the nearest whole dot.
    pub fn round(self) -> Dot {
        Dot(self.0.round())
    }

    /// Round to the nearest half dot.
    pub fn round_half(self) -> Dot {
        Dot((self.0 * 2.0).round() / 2.0)
    }

    pub fn ceil(self) -> Dot {
        Dot(self.0.ceil())
    }

    pub fn floor(self) -> Dot {
        Dot(self.0.floor())
    }

    /// Floor to the nearest `1/steps` dot. `steps <= 1` floors to a whole dot.
    pub fn floor_frac(self, steps: i32) -> Dot {
        if steps <= 1 {
            self.floor()
        } else {
            let s = steps as f32;
            Dot((self.0 * s).floor() / s)
        }
    }

    /// Rescale to an integer pixel count at `dpi`. Identity (plain rounding)
    /// for the 200-203 DPI band this unit is tuned for; outside that band
    /// dots are rescaled proportionally to the 203 DPI nominal pitch.
    pub fn at(self, dpi: f32) -> i64 {
        if (200.0..=203.0).contains(&dpi) {
            self.0.round() as i64
        } else {
            (self.0 * dpi / 203.0).round() as i64
        }
    }

    pub fn max(self, other: Dot) -> Dot {
        if self.0 >= other.0 {
            self
        } else {
            other
        }
    }

    pub fn min(self, other: Dot) -> Dot {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0.0
    }
}

impl From<f32> for Dot {
    fn from(v: f32) -> Self {
        Dot(v)
    }
}

impl From<i32> for Dot {
    fn from(v: i32) -> Self {
        Dot(v as f32)
    }
}

impl Add for Dot {
    type Output = Dot;
    fn add(self, rhs: Dot) -> Dot {
        Dot(self.0 + rhs.0)
    }
}

impl AddAssign for Dot {
    fn add_assign(&mut self, rhs: Dot) {
        self.0 += rhs.0;
    }
}

impl Sub for Dot {
    type Output = Dot;
    fn sub(self, rhs: Dot) -> Dot {
        Dot(self.0 - rhs.0)
    }
}

impl SubAssign for Dot {
    fn sub_assign(&mut self, rhs: Dot) {
        self.0 -= rhs.0;
    }
}

impl Neg for Dot {
    type Output = Dot;
    fn neg(self) -> Dot {
        Dot(-self.0)
    }
}

impl Mul<f32> for Dot {
    type Output = Dot;
    fn mul(self, rhs: f32) -> Dot {
        Dot(self.0 * rhs)
    }
}

impl Div<f32> for Dot {
    type Output = Dot;
    fn div(self, rhs: f32) -> Dot {
        Dot(self.0 / rhs)
    }
}

impl Div<i32> for Dot {
    type Output = Dot;
    fn div(self, rhs: i32) -> Dot {
        Dot(self.0 / rhs as f32)
    }
}

impl Eq for Dot {}
impl Ord for Dot {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal)
    }
}

/// An absolute position in `Dot` space.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Pos {
    pub x: Dot,
    pub y: Dot,
}

impl Pos {
    pub fn new(x: Dot, y: Dot) -> Self {
        Pos { x, y }
    }
}

/// A width/height pair in `Dot` space.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Dim {
    pub w: Dot,
    pub h: Dot,
}

impl Dim {
    pub fn new(w: Dot, h: Dot) -> Self {
        Dim { w, h }
    }
}

/// Position plus dimension: an absolutely-placed rectangle.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Box {
    pub x: Dot,
    pub y: Dot,
    pub w: Dot,
    pub h: Dot,
}

impl Box {
    pub fn new(pos: Pos, dim: Dim) -> Self {
        Box { x: pos.x, y: pos.y, w: dim.w, h: dim.h }
    }

    pub fn pos(self) -> Pos {
        Pos { x: self.x, y: self.y }
    }

    pub fn dim(self) -> Dim {
        Dim { w: self.w, h: self.h }
    }

    pub fn right(self) -> Dot {
        self.x + self.w
    }

    pub fn bottom(self) -> Dot {
        self.y + self.h
    }
}

/// Margin/padding offsets from each edge of a box.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Off {
    pub l: Dot,
    pub t: Dot,
    pub r: Dot,
    pub b: Dot,
}

impl Off {
    pub fn new(l: Dot, t: Dot, r: Dot, b: Dot) -> Self {
        Off { l, t, r, b }
    }

    pub fn uniform(w: Dot) -> Self {
        Off { l: w, t: w, r: w, b: w }
    }

    /// Shrinks `b` by this offset, clamping width/height to >= 0.
    pub fn inset(self, mut b: Box) -> Box {
        b.x += self.l;
        b.y += self.t;
        b.w -= self.l + self.r;
        b.h -= self.t + self.b;
        if b.w.0 < 0.0 {
            b.w = Dot::ZERO;
        }
        if b.h.0 < 0.0 {
            b.h = Dot::ZERO;
        }
        b
    }

    /// Grows `b` by this offset (the inverse of `inset`, without clamping).
    pub fn outset(self, mut b: Box) -> Box {
        b.x -= self.l;
        b.y -= self.t;
        b.w += self.l + self.r;
        b.h += self.t + self.b;
        b
    }
}

/// `inset`/`outset` on an `Option<Off>`, treating `None` as zero offset.
/// Mirrors the original's `*Off` nil-receiver methods.
pub trait OffOption {
    fn inset(self, b: Box) -> Box;
    fn outset(self, b: Box) -> Box;
}

impl OffOption for Option<Off> {
    fn inset(self, b: Box) -> Box {
        match self {
            Some(o) => o.inset(b),
            None => b,
        }
    }

    fn outset(self, b: Box) -> Box {
        match self {
            Some(o) => o.outset(b),
            None => b,
        }
    }
}

/// Horizontal alignment, unified across the layouter and the text shaper
/// (spec.md §9 notes the original used two different numberings for these).
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[repr(u8)]
pub enum Align {
    #[default]
    Left = 0,
    Right = 1,
    Center = 2,
}

impl Align {
    pub fn from_u8(v: u8) -> Align {
        match v {
            1 => Align::Right,
            2 => Align::Center,
            _ => Align::Left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inset_clamps_to_zero() {
        let off = Off::uniform(Dot(50.0));
        let b = Box { x: Dot(0.0), y: Dot(0.0), w: Dot(10.0), h: Dot(10.0) };
        let r = off.inset(b);
        assert_eq!(r.w, Dot::ZERO);
        assert_eq!(r.h, Dot::ZERO);
    }

    #[test]
    fn inset_outset_round_trip() {
        let off = Off::new(Dot(3.0), Dot(3.0), Dot(3.0), Dot(3.0));
        let b = Box { x: Dot(8.0), y: Dot(8.0), w: Dot(344.0), h: Dot(100.0) };
        let inner = off.inset(b);
        assert_eq!(inner, Box { x: Dot(11.0), y: Dot(11.0), w: Dot(338.0), h: Dot(94.0) });
        assert_eq!(off.outset(inner), b);
    }

    #[test]
    fn dot_rounding_discipline() {
        assert_eq!(Dot(1.2).ceil(), Dot(2.0));
        assert_eq!(Dot(1.8).floor(), Dot(1.0));
        assert_eq!(Dot(1.25).round_half(), Dot(1.5));
        assert_eq!(Dot(1.24).floor_frac(2), Dot(1.0));
    }

    #[test]
    fn at_dpi_is_identity_in_reference_band() {
        for dpi in [200.0, 201.0, 203.0] {
            let d = Dot(57.0);
            assert_eq!(d.at(dpi), d.round().0 as i64);
        }
    }

    #[test]
    fn align_from_u8_unifies_numbering() {
        assert_eq!(Align::from_u8(0), Align::Left);
        assert_eq!(Align::from_u8(1), Align::Right);
        assert_eq!(Align::from_u8(2), Align::Center);
    }
}
