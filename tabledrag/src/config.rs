//! Per-table drag configuration.

use std::fmt;
use std::rc::Rc;

use crate::dom::{Dom, InlineStyle};
use crate::error::HookError;

/// Default auto-scroll step and edge distance.
pub const DEFAULT_SCROLL_AMOUNT: i32 = 20;

/// Row marker that excludes a row from starting a drag.
pub const NO_DRAG_CLASS: &str = "nodrag";

/// Row marker that excludes a row from being a drop target.
pub const NO_DROP_CLASS: &str = "nodrop";

/// Participants of a drag, handed to the start and drop hooks.
pub struct DragEvent<'a> {
    pub table: &'a str,
    pub primary: &'a str,
    /// Companion rows in their pre-drag relative order.
    pub companions: &'a [String],
    /// The document as it stands when the hook fires.
    pub dom: &'a dyn Dom,
}

/// Whether a drop hook finished its work before returning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropStatus {
    /// The hook is done; another drop may run immediately.
    #[default]
    Done,
    /// The hook started work that is still running. Further drops are
    /// suppressed until [`TableDnd::finish_drop`](crate::TableDnd::finish_drop).
    Pending,
}

pub type DragStartHook = Rc<dyn Fn(&DragEvent<'_>) -> Result<(), HookError>>;
pub type DropHook = Rc<dyn Fn(&DragEvent<'_>) -> DropStatus>;
/// Called with `(dragged_row, candidate_row)`.
pub type AllowDropHook = Rc<dyn Fn(&str, &str) -> bool>;

/// Configuration for one table.
///
/// Every field is optional; an unset field disables the feature it controls.
#[derive(Clone)]
pub struct DragConfig {
    /// Class added to dragged rows while the drag is in progress.
    pub on_drag_class: Option<String>,

    /// Style applied to dragged rows when no drag class is set.
    pub on_drag_style: Option<InlineStyle>,

    /// Style applied to dragged rows on drop when no drag class is set.
    pub on_drop_style: Option<InlineStyle>,

    /// When set, only cells carrying this class start a drag. Otherwise any
    /// cell of a row not marked `nodrag` does.
    pub drag_handle: Option<String>,

    /// Class of the controls that select companion rows.
    pub checkable_class: Option<String>,

    /// Auto-scroll step, also the distance from the viewport edge at which
    /// scrolling kicks in. `0` disables auto-scroll.
    pub scroll_amount: i32,

    pub on_drag_start: Option<DragStartHook>,
    pub on_drop: Option<DropHook>,

    /// Overrides the `nodrop` marker entirely when set.
    pub on_allow_drop: Option<AllowDropHook>,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            on_drag_class: None,
            on_drag_style: None,
            on_drop_style: None,
            drag_handle: None,
            checkable_class: None,
            scroll_amount: DEFAULT_SCROLL_AMOUNT,
            on_drag_start: None,
            on_drop: None,
            on_allow_drop: None,
        }
    }
}

impl fmt::Debug for DragConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragConfig")
            .field("on_drag_class", &self.on_drag_class)
            .field("on_drag_style", &self.on_drag_style)
            .field("on_drop_style", &self.on_drop_style)
            .field("drag_handle", &self.drag_handle)
            .field("checkable_class", &self.checkable_class)
            .field("scroll_amount", &self.scroll_amount)
            .field("on_drag_start", &self.on_drag_start.is_some())
            .field("on_drop", &self.on_drop.is_some())
            .field("on_allow_drop", &self.on_allow_drop.is_some())
            .finish()
    }
}

impl DragConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drag_class(mut self, class: impl Into<String>) -> Self {
        self.on_drag_class = Some(class.into());
        self
    }

    pub fn drag_style(mut self, style: InlineStyle) -> Self {
        self.on_drag_style = Some(style);
        self
    }

    pub fn drop_style(mut self, style: InlineStyle) -> Self {
        self.on_drop_style = Some(style);
        self
    }

    pub fn drag_handle(mut self, class: impl Into<String>) -> Self {
        self.drag_handle = Some(class.into());
        self
    }

    pub fn checkable_class(mut self, class: impl Into<String>) -> Self {
        self.checkable_class = Some(class.into());
        self
    }

    pub fn scroll_amount(mut self, amount: i32) -> Self {
        self.scroll_amount = amount;
        self
    }

    pub fn on_drag_start(
        mut self,
        hook: impl Fn(&DragEvent<'_>) -> Result<(), HookError> + 'static,
    ) -> Self {
        self.on_drag_start = Some(Rc::new(hook));
        self
    }

    pub fn on_drop(mut self, hook: impl Fn(&DragEvent<'_>) -> DropStatus + 'static) -> Self {
        self.on_drop = Some(Rc::new(hook));
        self
    }

    pub fn on_allow_drop(mut self, hook: impl Fn(&str, &str) -> bool + 'static) -> Self {
        self.on_allow_drop = Some(Rc::new(hook));
        self
    }

    /// Whether `candidate` may receive `dragged`.
    pub fn allows_drop(&self, dom: &dyn Dom, dragged: &str, candidate: &str) -> bool {
        match &self.on_allow_drop {
            Some(hook) => hook(dragged, candidate),
            None => !dom.has_class(candidate, NO_DROP_CLASS),
        }
    }
}

/// How dragged rows are marked, resolved once per table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VisualMarker {
    /// A class added while dragging and removed on drop.
    Class(String),
    /// Inline styles applied while dragging and on drop.
    InlineStyle {
        dragging: Option<InlineStyle>,
        dropped: Option<InlineStyle>,
    },
    #[default]
    None,
}

impl VisualMarker {
    /// A drag class wins over drag/drop styles.
    pub fn resolve(config: &DragConfig) -> Self {
        if let Some(class) = &config.on_drag_class {
            return Self::Class(class.clone());
        }
        if config.on_drag_style.is_some() || config.on_drop_style.is_some() {
            return Self::InlineStyle {
                dragging: config.on_drag_style.clone(),
                dropped: config.on_drop_style.clone(),
            };
        }
        Self::None
    }

    pub fn apply(&self, dom: &mut dyn Dom, rows: &[&str]) {
        match self {
            Self::Class(class) => rows.iter().for_each(|row| dom.add_class(row, class)),
            Self::InlineStyle {
                dragging: Some(style),
                ..
            } => rows.iter().for_each(|row| dom.apply_style(row, style)),
            _ => {}
        }
    }

    pub fn release(&self, dom: &mut dyn Dom, rows: &[&str]) {
        match self {
            Self::Class(class) => rows.iter().for_each(|row| dom.remove_class(row, class)),
            Self::InlineStyle {
                dropped: Some(style),
                ..
            } => rows.iter().for_each(|row| dom.apply_style(row, style)),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_marker_takes_precedence() {
        let config = DragConfig::new()
            .drag_style(InlineStyle::new().set("opacity", "0.5"))
            .drag_class("dragging");
        assert_eq!(
            VisualMarker::resolve(&config),
            VisualMarker::Class("dragging".to_string())
        );
    }

    #[test]
    fn drop_style_alone_resolves_to_inline_style() {
        let style = InlineStyle::new().set("background", "white");
        let config = DragConfig::new().drop_style(style.clone());
        assert_eq!(
            VisualMarker::resolve(&config),
            VisualMarker::InlineStyle {
                dragging: None,
                dropped: Some(style),
            }
        );
    }

    #[test]
    fn unset_markers_resolve_to_none() {
        assert_eq!(VisualMarker::resolve(&DragConfig::new()), VisualMarker::None);
    }
}
