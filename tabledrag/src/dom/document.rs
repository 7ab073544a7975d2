use std::collections::HashMap;

use log::{trace, warn};

use super::{Dom, Element, ElementKind, InlineStyle, OffsetBox, Viewport};
use crate::error::DomError;
use crate::geometry::{Point, Rect};

#[derive(Debug, Clone)]
struct Node {
    kind: ElementKind,
    classes: Vec<String>,
    style: InlineStyle,
    width: i32,
    height: i32,
    padding: i32,
    gap: i32,
    collapsed: bool,
    checked: bool,
    text: Option<String>,
    parent: Option<String>,
    children: Vec<String>,
}

#[derive(Debug, Clone, Default)]
struct LayoutBox {
    offset: OffsetBox,
    /// Page rectangle, always using the occupied height.
    absolute: Rect,
}

/// In-memory table document.
///
/// Blocks (containers and tables) stack their children vertically, rows lay
/// their cells out horizontally. Rows and cells use their table as offset
/// parent, controls use their cell. Layout is recomputed after every
/// structural change so measurements always reflect the current order.
#[derive(Debug, Clone)]
pub struct Document {
    root: String,
    nodes: HashMap<String, Node>,
    layout: HashMap<String, LayoutBox>,
    scroll: Point,
    viewport_height: i32,
}

impl Document {
    /// Build a document from an element tree. The viewport initially shows the
    /// whole document.
    pub fn new(root: Element) -> Self {
        let mut doc = Self {
            root: root.id.clone(),
            nodes: HashMap::new(),
            layout: HashMap::new(),
            scroll: Point::default(),
            viewport_height: 0,
        };
        doc.insert_tree(root, None);
        doc.relayout();
        doc.viewport_height = doc.content_height();
        doc
    }

    pub fn with_viewport_height(mut self, height: i32) -> Self {
        self.set_viewport_height(height);
        self
    }

    pub fn set_viewport_height(&mut self, height: i32) {
        self.viewport_height = height.max(0);
        self.clamp_scroll();
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.nodes.get(id)?.text.as_deref()
    }

    pub fn classes(&self, id: &str) -> &[String] {
        self.nodes
            .get(id)
            .map(|node| node.classes.as_slice())
            .unwrap_or_default()
    }

    pub fn style(&self, id: &str) -> Option<&InlineStyle> {
        self.nodes.get(id).map(|node| &node.style)
    }

    pub fn children(&self, id: &str) -> &[String] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
    }

    pub fn set_checked(&mut self, id: &str, checked: bool) -> Result<(), DomError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| DomError::UnknownElement(id.to_string()))?;
        node.checked = checked;
        Ok(())
    }

    /// Flip a control's checked state, returning the new state.
    pub fn toggle_checked(&mut self, id: &str) -> Result<bool, DomError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| DomError::UnknownElement(id.to_string()))?;
        node.checked = !node.checked;
        Ok(node.checked)
    }

    /// Append a subtree as the last child of `parent`.
    pub fn append(&mut self, parent: &str, element: Element) -> Result<(), DomError> {
        if !self.nodes.contains_key(parent) {
            return Err(DomError::UnknownElement(parent.to_string()));
        }
        let id = element.id.clone();
        self.insert_tree(element, Some(parent));
        if let Some(node) = self.nodes.get_mut(parent) {
            node.children.push(id);
        }
        self.relayout();
        Ok(())
    }

    /// Unlink an element from its parent. The element keeps its id and
    /// subtree but no longer has a layout box.
    pub fn detach(&mut self, id: &str) -> Result<(), DomError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| DomError::UnknownElement(id.to_string()))?;
        let parent = node.parent.take().ok_or_else(|| DomError::Detached(id.to_string()))?;
        if let Some(parent) = self.nodes.get_mut(&parent) {
            parent.children.retain(|child| child != id);
        }
        self.relayout();
        Ok(())
    }

    /// Page rectangle of an attached element.
    pub fn rect(&self, id: &str) -> Option<Rect> {
        self.layout.get(id).map(|layout| layout.absolute)
    }

    pub fn content_height(&self) -> i32 {
        self.rect(&self.root).map(|rect| rect.height).unwrap_or(0)
    }

    /// Find the deepest element at the given page coordinates.
    pub fn hit_test(&self, x: i32, y: i32) -> Option<String> {
        self.hit_test_element(&self.root, x, y)
    }

    fn hit_test_element(&self, id: &str, x: i32, y: i32) -> Option<String> {
        let rect = self.rect(id)?;
        if !rect.contains(x, y) {
            return None;
        }

        // Check children in reverse order (last laid out = on top)
        if let Some(node) = self.nodes.get(id) {
            for child in node.children.iter().rev() {
                if let Some(found) = self.hit_test_element(child, x, y) {
                    return Some(found);
                }
            }
        }

        Some(id.to_string())
    }

    fn insert_tree(&mut self, element: Element, parent: Option<&str>) {
        let Element {
            id,
            kind,
            classes,
            width,
            height,
            padding,
            gap,
            collapsed,
            checked,
            text,
            children,
        } = element;

        if self.nodes.contains_key(&id) {
            warn!("Duplicate element id '{id}', later definition wins");
        }

        let child_ids = children.iter().map(|child| child.id.clone()).collect();
        self.nodes.insert(
            id.clone(),
            Node {
                kind,
                classes,
                style: InlineStyle::default(),
                width,
                height,
                padding,
                gap,
                collapsed,
                checked,
                text,
                parent: parent.map(str::to_string),
                children: child_ids,
            },
        );

        for child in children {
            self.insert_tree(child, Some(&id));
        }
    }

    fn collect<'a>(&'a self, id: &'a str, visit: &mut impl FnMut(&'a str, &'a Node)) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        visit(id, node);
        for child in &node.children {
            self.collect(child, visit);
        }
    }

    fn clamp_scroll(&mut self) {
        let max_y = (self.content_height() - self.viewport_height).max(0);
        self.scroll.x = self.scroll.x.max(0);
        self.scroll.y = self.scroll.y.clamp(0, max_y);
    }

    fn relayout(&mut self) {
        let mut layout = HashMap::new();
        let root = self.root.clone();
        self.layout_element(&root, None, Point::default(), Point::default(), &mut layout);
        self.layout = layout;
        self.clamp_scroll();
    }

    /// Lay out one element and its subtree. `offset` is relative to `parent`,
    /// `origin` is the page position. Returns the occupied `(width, height)`.
    fn layout_element(
        &self,
        id: &str,
        parent: Option<&str>,
        offset: Point,
        origin: Point,
        out: &mut HashMap<String, LayoutBox>,
    ) -> (i32, i32) {
        let Some(node) = self.nodes.get(id) else {
            return (0, 0);
        };

        let (width, height) = match node.kind {
            ElementKind::Container | ElementKind::Table => self.layout_block(id, node, origin, out),
            ElementKind::Row => self.layout_row(id, node, parent, offset, origin, out),
            ElementKind::Cell | ElementKind::Control => self.layout_leaf(id, node, origin, out),
        };

        let reported = if node.collapsed { 0 } else { height };
        out.insert(
            id.to_string(),
            LayoutBox {
                offset: OffsetBox {
                    left: offset.x,
                    top: offset.y,
                    width,
                    height: reported,
                    parent: parent.map(str::to_string),
                },
                absolute: Rect::new(origin.x, origin.y, width, height),
            },
        );
        (width, height)
    }

    fn layout_block(
        &self,
        id: &str,
        node: &Node,
        origin: Point,
        out: &mut HashMap<String, LayoutBox>,
    ) -> (i32, i32) {
        let mut cursor = node.padding;
        let mut inner_width = 0;
        for (i, child) in node.children.iter().enumerate() {
            if i > 0 {
                cursor += node.gap;
            }
            let child_offset = Point::new(node.padding, cursor);
            let (w, h) = self.layout_element(child, Some(id), child_offset, origin + child_offset, out);
            cursor += h;
            inner_width = inner_width.max(w);
        }

        let width = node.width.max(inner_width + node.padding * 2);
        let height = node.height.max(cursor + node.padding);
        (width, height)
    }

    /// Rows share their offset parent with their cells, so cells are placed
    /// relative to the row's parent rather than the row.
    fn layout_row(
        &self,
        id: &str,
        node: &Node,
        parent: Option<&str>,
        offset: Point,
        origin: Point,
        out: &mut HashMap<String, LayoutBox>,
    ) -> (i32, i32) {
        let height = if node.height > 0 {
            node.height
        } else {
            node.children
                .iter()
                .filter_map(|child| self.nodes.get(child))
                .map(|child| child.height)
                .max()
                .unwrap_or(0)
                .max(1)
        };

        let mut cursor_x = 0;
        for child in &node.children {
            let Some(cell) = self.nodes.get(child) else {
                continue;
            };
            let cell_width = leaf_width(cell);
            let shift = Point::new(cursor_x, 0);
            let cell_origin = origin + shift;
            out.insert(
                child.clone(),
                LayoutBox {
                    offset: OffsetBox {
                        left: offset.x + cursor_x,
                        top: offset.y,
                        width: cell_width,
                        height: if cell.collapsed { 0 } else { height },
                        parent: parent.map(str::to_string),
                    },
                    absolute: Rect::new(cell_origin.x, cell_origin.y, cell_width, height),
                },
            );
            self.layout_cell_content(child, cell, cell_width, height, cell_origin, out);
            cursor_x += cell_width;
        }

        trace!("Row '{id}' laid out at {offset:?} with height {height}");
        (node.width.max(cursor_x), height)
    }

    fn layout_cell_content(
        &self,
        id: &str,
        cell: &Node,
        cell_width: i32,
        height: i32,
        origin: Point,
        out: &mut HashMap<String, LayoutBox>,
    ) {
        for child in &cell.children {
            let Some(control) = self.nodes.get(child) else {
                continue;
            };
            let width = leaf_width(control).min(cell_width);
            out.insert(
                child.clone(),
                LayoutBox {
                    offset: OffsetBox {
                        left: 0,
                        top: 0,
                        width,
                        height,
                        parent: Some(id.to_string()),
                    },
                    absolute: Rect::new(origin.x, origin.y, width, height),
                },
            );
        }
    }

    fn layout_leaf(
        &self,
        id: &str,
        node: &Node,
        origin: Point,
        out: &mut HashMap<String, LayoutBox>,
    ) -> (i32, i32) {
        let width = leaf_width(node);
        let height = node.height.max(1);
        self.layout_cell_content(id, node, width, height, origin, out);
        (width, height)
    }
}

fn leaf_width(node: &Node) -> i32 {
    if node.width > 0 {
        return node.width;
    }
    node.text
        .as_deref()
        .map(|text| text.chars().count() as i32)
        .unwrap_or(0)
        .max(1)
}

impl Dom for Document {
    fn rows(&self, table: &str) -> Vec<String> {
        self.children(table)
            .iter()
            .filter(|child| self.kind(child) == Some(ElementKind::Row))
            .cloned()
            .collect()
    }

    fn kind(&self, id: &str) -> Option<ElementKind> {
        self.nodes.get(id).map(|node| node.kind)
    }

    fn parent(&self, id: &str) -> Option<String> {
        self.nodes.get(id)?.parent.clone()
    }

    fn first_child(&self, id: &str) -> Option<String> {
        self.nodes.get(id)?.children.first().cloned()
    }

    fn next_sibling(&self, id: &str) -> Option<String> {
        let parent = self.nodes.get(id)?.parent.as_deref()?;
        let siblings = &self.nodes.get(parent)?.children;
        let index = siblings.iter().position(|sibling| sibling == id)?;
        siblings.get(index + 1).cloned()
    }

    fn has_class(&self, id: &str, class: &str) -> bool {
        self.classes(id).iter().any(|c| c == class)
    }

    fn add_class(&mut self, id: &str, class: &str) {
        let Some(node) = self.nodes.get_mut(id) else {
            trace!("add_class on unknown element '{id}'");
            return;
        };
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, id: &str, class: &str) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.classes.retain(|c| c != class);
        }
    }

    fn apply_style(&mut self, id: &str, style: &InlineStyle) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.style.merge(style);
        }
    }

    fn is_checked(&self, id: &str) -> bool {
        self.nodes
            .get(id)
            .is_some_and(|node| node.kind == ElementKind::Control && node.checked)
    }

    fn find_by_class(&self, root: &str, class: &str) -> Vec<String> {
        let mut result = Vec::new();
        for child in self.children(root) {
            self.collect(child, &mut |id, node| {
                if node.classes.iter().any(|c| c == class) {
                    result.push(id.to_string());
                }
            });
        }
        result
    }

    fn offset_box(&self, id: &str) -> Option<OffsetBox> {
        self.layout.get(id).map(|layout| layout.offset.clone())
    }

    fn viewport(&self) -> Viewport {
        Viewport {
            scroll_x: self.scroll.x,
            scroll_y: self.scroll.y,
            height: self.viewport_height,
        }
    }

    fn scroll_by(&mut self, dx: i32, dy: i32) {
        self.scroll = self.scroll + Point::new(dx, dy);
        self.clamp_scroll();
    }

    fn insert_before(&mut self, node: &str, reference: Option<&str>) -> Result<(), DomError> {
        let parent = self
            .nodes
            .get(node)
            .ok_or_else(|| DomError::UnknownElement(node.to_string()))?
            .parent
            .clone()
            .ok_or_else(|| DomError::Detached(node.to_string()))?;

        if let Some(reference) = reference {
            if reference == node {
                return Ok(());
            }
            let reference_parent = self
                .nodes
                .get(reference)
                .ok_or_else(|| DomError::UnknownElement(reference.to_string()))?
                .parent
                .clone()
                .ok_or_else(|| DomError::Detached(reference.to_string()))?;
            if reference_parent != parent {
                return Err(DomError::NotSibling {
                    node: node.to_string(),
                    reference: reference.to_string(),
                });
            }
        }

        let siblings = &mut self
            .nodes
            .get_mut(&parent)
            .ok_or_else(|| DomError::Detached(node.to_string()))?
            .children;
        siblings.retain(|sibling| sibling != node);
        let index = reference
            .and_then(|reference| siblings.iter().position(|sibling| sibling == reference))
            .unwrap_or(siblings.len());
        siblings.insert(index, node.to_string());

        self.relayout();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Document {
        Document::new(
            Element::container().id("body").child(
                Element::table().id("t").children(
                    ["a", "b", "c"]
                        .into_iter()
                        .map(|name| Element::row().id(name).height(10).child(Element::cell(name))),
                ),
            ),
        )
    }

    #[test]
    fn insert_before_none_moves_to_end() {
        let mut doc = table();
        doc.insert_before("a", None).unwrap();
        assert_eq!(doc.rows("t"), vec!["b", "c", "a"]);
        assert_eq!(doc.offset_box("a").unwrap().top, 20);
    }

    #[test]
    fn insert_before_self_is_noop() {
        let mut doc = table();
        doc.insert_before("b", Some("b")).unwrap();
        assert_eq!(doc.rows("t"), vec!["a", "b", "c"]);
    }

    #[test]
    fn insert_after_last_appends() {
        let mut doc = table();
        doc.insert_after("a", "c").unwrap();
        assert_eq!(doc.rows("t"), vec!["b", "c", "a"]);
    }

    #[test]
    fn detached_node_cannot_move() {
        let mut doc = table();
        doc.detach("b").unwrap();
        assert_eq!(
            doc.insert_before("b", Some("a")),
            Err(DomError::Detached("b".to_string()))
        );
        assert_eq!(
            doc.insert_before("a", Some("b")),
            Err(DomError::Detached("b".to_string()))
        );
        assert!(doc.offset_box("b").is_none());
    }

    #[test]
    fn scroll_is_clamped_to_content() {
        let mut doc = table().with_viewport_height(10);
        doc.scroll_by(0, 100);
        assert_eq!(doc.viewport().scroll_y, 20);
        doc.scroll_by(0, -100);
        assert_eq!(doc.viewport().scroll_y, 0);
    }
}
