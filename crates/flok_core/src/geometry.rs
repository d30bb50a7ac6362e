//! Geometry primitives for element bounds and observer margins

/// An axis-aligned rectangle in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Move the rectangle by an offset
    pub fn translate(&self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Intersection of two rectangles.
    ///
    /// Edge-adjacent rectangles produce a zero-area intersection rather than
    /// `None`, matching how platform observers treat touching edges.
    pub fn intersect(&self, other: &Bounds) -> Option<Bounds> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        if right < left || bottom < top {
            return None;
        }

        Some(Bounds::new(left, top, right - left, bottom - top))
    }

    /// Grow (or shrink, for negative values) the rectangle by a margin
    pub fn expand(&self, margin: &RootMargin) -> Self {
        let top = margin.top.resolve(self.height);
        let right = margin.right.resolve(self.width);
        let bottom = margin.bottom.resolve(self.height);
        let left = margin.left.resolve(self.width);

        Self {
            x: self.x - left,
            y: self.y - top,
            width: (self.width + left + right).max(0.0),
            height: (self.height + top + bottom).max(0.0),
        }
    }
}

/// One side of a root margin
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MarginValue {
    /// Absolute pixels
    Px(f32),
    /// Percentage of the root's size along the same axis
    Percent(f32),
}

impl MarginValue {
    /// Resolve against the root extent along this side's axis
    pub fn resolve(&self, extent: f32) -> f32 {
        match *self {
            MarginValue::Px(px) => px,
            MarginValue::Percent(pct) => extent * pct / 100.0,
        }
    }
}

impl Default for MarginValue {
    fn default() -> Self {
        MarginValue::Px(0.0)
    }
}

/// Margin applied to an observer's root before intersecting.
///
/// Negative values shrink the root, so `bottom: Percent(-10.0)` only counts
/// an element as visible once it clears the bottom tenth of the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RootMargin {
    pub top: MarginValue,
    pub right: MarginValue,
    pub bottom: MarginValue,
    pub left: MarginValue,
}

impl RootMargin {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Margin that only adjusts the bottom edge, as a percentage
    pub fn bottom_percent(pct: f32) -> Self {
        Self {
            bottom: MarginValue::Percent(pct),
            ..Self::default()
        }
    }

    /// Uniform pixel margin on all sides
    pub fn uniform_px(px: f32) -> Self {
        Self {
            top: MarginValue::Px(px),
            right: MarginValue::Px(px),
            bottom: MarginValue::Px(px),
            left: MarginValue::Px(px),
        }
    }
}
