use std::sync::atomic::{AtomicU64, Ordering};

use super::ElementKind;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn generate_id(prefix: &str) -> String {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id}")
}

/// Declarative description of a document subtree.
///
/// Elements are built with chained setters and handed to
/// [`Document::new`](super::Document::new), which flattens them into a
/// mutable tree.
#[derive(Debug, Clone)]
pub struct Element {
    // Identity
    pub id: String,
    pub kind: ElementKind,
    pub classes: Vec<String>,

    // Box
    /// Fixed width; `0` lets the layout derive it from children.
    pub width: i32,
    /// Fixed height; `0` lets the layout derive it from children.
    pub height: i32,
    /// Inner spacing on every side (containers and tables).
    pub padding: i32,
    /// Space between stacked children (containers and tables).
    pub gap: i32,

    /// Report a zero offset height while still occupying layout space. Mimics
    /// renderers that measure table rows or cells as empty.
    pub collapsed: bool,

    // Controls
    pub checked: bool,

    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    fn new(kind: ElementKind, prefix: &str) -> Self {
        Self {
            id: generate_id(prefix),
            kind,
            classes: Vec::new(),
            width: 0,
            height: 0,
            padding: 0,
            gap: 0,
            collapsed: false,
            checked: false,
            text: None,
            children: Vec::new(),
        }
    }

    pub fn container() -> Self {
        Self::new(ElementKind::Container, "container")
    }

    pub fn table() -> Self {
        Self::new(ElementKind::Table, "table")
    }

    pub fn row() -> Self {
        Self::new(ElementKind::Row, "row")
    }

    pub fn cell(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Cell, "cell").text(text)
    }

    /// A checkbox control.
    pub fn checkbox() -> Self {
        Self::new(ElementKind::Control, "checkbox")
    }

    // Identity
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    // Box
    pub fn width(mut self, width: i32) -> Self {
        self.width = width;
        self
    }

    pub fn height(mut self, height: i32) -> Self {
        self.height = height;
        self
    }

    pub fn padding(mut self, padding: i32) -> Self {
        self.padding = padding;
        self
    }

    pub fn gap(mut self, gap: i32) -> Self {
        self.gap = gap;
        self
    }

    pub fn collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    // Children
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, new_children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(new_children);
        self
    }
}
