//! Element and pointer geometry.
//!
//! Positions are page coordinates: the sum of every offset in an element's
//! offset-parent chain. Pointer events are normalised into the same space so
//! that the two can be subtracted.

use crate::dom::{Dom, Viewport};
use crate::event::PointerEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Get the center point of this rectangle.
    pub const fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// Absolute page position of an element.
///
/// Table rows in some renderers report a zero height and a bogus offset; when
/// that happens the row's first child (a cell) is measured instead. An element
/// with no offset box resolves to `(0, 0)`.
pub fn position(dom: &dyn Dom, id: &str) -> Point {
    measure(dom, id).map(|rect| rect.origin()).unwrap_or_default()
}

/// Absolute page rectangle of an element, with the zero-height fallback
/// applied.
pub fn measure(dom: &dyn Dom, id: &str) -> Option<Rect> {
    let probe = probe_element(dom, id)?;
    let size = dom.offset_box(&probe)?;

    let mut origin = Point::default();
    let mut current = Some(probe);
    while let Some(element) = current {
        let Some(offset) = dom.offset_box(&element) else {
            break;
        };
        origin = origin + Point::new(offset.left, offset.top);
        current = offset.parent;
    }

    Some(Rect::new(origin.x, origin.y, size.width, size.height))
}

fn probe_element(dom: &dyn Dom, id: &str) -> Option<String> {
    let offset = dom.offset_box(id)?;
    if offset.height == 0 {
        if let Some(child) = dom.first_child(id) {
            return Some(child);
        }
    }
    Some(id.to_string())
}

/// Pointer coordinate minus the element's position.
pub fn pointer_offset(dom: &dyn Dom, id: &str, event: &PointerEvent) -> Point {
    pointer_coordinates(event, dom.viewport()) - position(dom, id)
}

/// Page coordinates of a pointer event.
///
/// Prefers the page coordinates carried by the event; otherwise the client
/// coordinates are shifted by the current scroll offset.
pub fn pointer_coordinates(event: &PointerEvent, viewport: Viewport) -> Point {
    match event.page {
        Some(page) => page,
        None => event.client + Point::new(viewport.scroll_x, viewport.scroll_y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_is_half_open() {
        let rect = Rect::new(0, 10, 5, 10);
        assert!(rect.contains(0, 10));
        assert!(rect.contains(4, 19));
        assert!(!rect.contains(5, 10));
        assert!(!rect.contains(0, 20));
    }

    #[test]
    fn client_coordinates_shift_by_scroll() {
        let event = PointerEvent::moved_client(3, 4);
        let viewport = Viewport {
            scroll_x: 1,
            scroll_y: 40,
            height: 100,
        };
        assert_eq!(pointer_coordinates(&event, viewport), Point::new(4, 44));
    }

    #[test]
    fn page_coordinates_win_over_client() {
        let mut event = PointerEvent::moved(7, 9);
        event.client = Point::new(100, 100);
        let viewport = Viewport {
            scroll_x: 0,
            scroll_y: 40,
            height: 100,
        };
        assert_eq!(pointer_coordinates(&event, viewport), Point::new(7, 9));
    }
}
