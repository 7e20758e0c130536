//! Rectangle drag-select across blocks.

/// An axis-aligned rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Whether the rectangles intersect. Touching edges count.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.top > other.bottom()
            || self.right() < other.left
            || self.bottom() < other.top
            || self.left > other.right())
    }
}

/// State of an in-progress mouse drag.
#[derive(Debug, Clone, Default)]
pub struct DragSelection {
    from: (f64, f64),
    to: (f64, f64),
    selecting: bool,
}

impl DragSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mouse down: start a new drag at the pointer.
    pub fn begin(&mut self, x: f64, y: f64) {
        self.selecting = true;
        self.from = (x, y);
        self.to = (x, y);
    }

    /// Mouse move: extend the drag. Returns the rectangle to draw, or
    /// `None` when no drag is active.
    pub fn update(&mut self, x: f64, y: f64) -> Option<Rect> {
        if !self.selecting {
            return None;
        }
        self.to = (x, y);
        Some(self.rect())
    }

    /// Mouse up: end the drag. Returns the final rectangle if it is at
    /// least `threshold` pixels in both dimensions.
    pub fn finish(&mut self, threshold: f64) -> Option<Rect> {
        self.selecting = false;
        let rect = self.rect();
        (rect.width >= threshold && rect.height >= threshold).then_some(rect)
    }

    pub fn is_selecting(&self) -> bool {
        self.selecting
    }

    /// The rectangle spanned by the drag's two corners.
    pub fn rect(&self) -> Rect {
        let (fx, fy) = self.from;
        let (tx, ty) = self.to;
        Rect::new(fx.min(tx), fy.min(ty), (tx - fx).abs(), (ty - fy).abs())
    }
}

/// Ids of the blocks whose rectangles overlap the selection rectangle,
/// in the order given.
pub fn blocks_in_rect<I, S>(selection: &Rect, blocks: I) -> Vec<S>
where
    I: IntoIterator<Item = (S, Rect)>,
{
    blocks
        .into_iter()
        .filter(|(_, rect)| rect.overlaps(selection))
        .map(|(id, _)| id)
        .collect()
}
