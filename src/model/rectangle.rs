//! Bounding-box value type.

/// An axis-aligned bounding box in page coordinates.
///
/// Converter output carries floating-point coordinates; they are truncated
/// to integers at parse time, so all downstream geometry is integral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rectangle {
    /// Distance from the left page edge
    pub left: i32,

    /// Distance from the top page edge
    pub top: i32,

    /// Box width
    pub width: i32,

    /// Box height
    pub height: i32,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge coordinate.
    pub fn right(&self) -> i32 {
        self.left + self.width
    }

    /// Bottom edge coordinate.
    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }

    /// Smallest rectangle enclosing all input rectangles.
    ///
    /// Edges are the min of all lefts/tops and the max of all rights/bottoms,
    /// so the result is independent of input order. Returns `None` for an
    /// empty input.
    pub fn merge<'a, I>(rectangles: I) -> Option<Rectangle>
    where
        I: IntoIterator<Item = &'a Rectangle>,
    {
        rectangles.into_iter().fold(None, |merged, rect| {
            Some(match merged {
                None => *rect,
                Some(m) => {
                    let left = m.left.min(rect.left);
                    let top = m.top.min(rect.top);
                    let right = m.right().max(rect.right());
                    let bottom = m.bottom().max(rect.bottom());
                    Rectangle::new(left, top, right - left, bottom - top)
                }
            })
        })
    }
}
