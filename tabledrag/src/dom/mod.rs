//! Host document capabilities.
//!
//! The drag machinery never touches a concrete page. Everything it needs from
//! the host (row order, markers, measurements, reorder primitives and the
//! viewport) goes through the [`Dom`] trait. [`Document`] is an in-memory
//! implementation used by terminal front-ends and tests.

mod document;
mod element;
mod style;

pub use document::Document;
pub use element::Element;
pub use style::InlineStyle;

use crate::error::DomError;

/// Role of an element within a table document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Plain block container (page body, wrappers).
    Container,
    Table,
    Row,
    Cell,
    /// Form control inside a cell, e.g. a selection checkbox.
    Control,
}

/// Layout box of an element relative to its offset parent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OffsetBox {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    /// Element the offsets are relative to; `None` at the root.
    pub parent: Option<String>,
}

/// Visible part of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub scroll_x: i32,
    pub scroll_y: i32,
    /// Height of the visible area.
    pub height: i32,
}

pub trait Dom {
    /// Rows of a table in current display order.
    fn rows(&self, table: &str) -> Vec<String>;

    fn kind(&self, id: &str) -> Option<ElementKind>;

    fn parent(&self, id: &str) -> Option<String>;

    fn first_child(&self, id: &str) -> Option<String>;

    fn next_sibling(&self, id: &str) -> Option<String>;

    fn has_class(&self, id: &str, class: &str) -> bool;

    fn add_class(&mut self, id: &str, class: &str);

    fn remove_class(&mut self, id: &str, class: &str);

    /// Merge inline style properties into an element.
    fn apply_style(&mut self, id: &str, style: &InlineStyle);

    /// Whether a control is checked. Non-controls are never checked.
    fn is_checked(&self, id: &str) -> bool;

    /// Descendants of `root` carrying `class`, in document order.
    fn find_by_class(&self, root: &str, class: &str) -> Vec<String>;

    fn offset_box(&self, id: &str) -> Option<OffsetBox>;

    fn viewport(&self) -> Viewport;

    fn scroll_by(&mut self, dx: i32, dy: i32);

    /// Move `node` so it sits right before `reference` under the same parent.
    /// A `None` reference moves `node` to the end of its parent.
    fn insert_before(&mut self, node: &str, reference: Option<&str>) -> Result<(), DomError>;

    /// Move `node` so it sits right after `reference`.
    fn insert_after(&mut self, node: &str, reference: &str) -> Result<(), DomError> {
        if self.kind(reference).is_none() {
            return Err(DomError::UnknownElement(reference.to_string()));
        }
        let next = self.next_sibling(reference);
        self.insert_before(node, next.as_deref())
    }

    /// Nearest element of `kind`, starting with `id` itself.
    fn closest(&self, id: &str, kind: ElementKind) -> Option<String> {
        let mut current = Some(id.to_string());
        while let Some(element) = current {
            if self.kind(&element) == Some(kind) {
                return Some(element);
            }
            current = self.parent(&element);
        }
        None
    }
}
