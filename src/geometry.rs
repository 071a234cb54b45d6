//! Plain geometry used by the viewport and connector engine.

/// Anything with an axis-aligned box: measured node elements, viewports.
pub trait NodeGeometry {
    fn rect(&self) -> Rect;
}

/// Width and height of a viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Axis-aligned rectangle (x, y is the top-left corner).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn center(&self) -> (f32, f32) {
        (self.center_x(), self.center_y())
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }
}

impl NodeGeometry for Rect {
    fn rect(&self) -> Rect {
        *self
    }
}

/// Axis-aligned box covering every item, or `None` for an empty input.
pub fn bounding_box<G, I>(items: I) -> Option<Rect>
where
    G: NodeGeometry,
    I: IntoIterator<Item = G>,
{
    items
        .into_iter()
        .map(|g| g.rect())
        .reduce(|acc, r| acc.union(&r))
}
