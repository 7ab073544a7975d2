//! The drag state machine and row reordering.

use log::{debug, trace, warn};

use crate::config::{DragConfig, VisualMarker};
use crate::dom::Dom;
use crate::geometry::Point;
use crate::selection::Selection;
use crate::target::find_drop_target;

/// Drag state of a [`TableDnd`](crate::TableDnd).
#[derive(Debug, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging(_))
    }

    pub fn session(&self) -> Option<&DragSession> {
        match self {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    pub fn session_mut(&mut self) -> Option<&mut DragSession> {
        match self {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }
}

/// One active drag, from pointer-down to pointer-up.
#[derive(Debug, Clone)]
pub struct DragSession {
    table: String,
    selection: Selection,
    /// Pointer position relative to the primary row at grab time.
    grab_offset: Point,
    /// Last processed top edge of the dragged row.
    last_y: i32,
}

impl DragSession {
    /// Start a session. `grab_offset` is the pointer position relative to the
    /// primary row, `start_y` the row's top edge at grab time.
    pub fn new(table: impl Into<String>, selection: Selection, grab_offset: Point, start_y: i32) -> Self {
        Self {
            table: table.into(),
            selection,
            grab_offset,
            last_y: start_y,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn primary(&self) -> &str {
        &self.selection.primary
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn grab_offset(&self) -> Point {
        self.grab_offset
    }

    pub fn last_y(&self) -> i32 {
        self.last_y
    }

    /// Process one pointer sample at page coordinates `pointer`.
    ///
    /// Returns the drop target the primary row was moved to, if any.
    pub fn on_move(
        &mut self,
        dom: &mut dyn Dom,
        config: &DragConfig,
        marker: &VisualMarker,
        pointer: Point,
    ) -> Option<String> {
        let y = pointer.y - self.grab_offset.y;

        auto_scroll(dom, pointer, config.scroll_amount);

        if y == self.last_y {
            return None;
        }
        let moving_down = y > self.last_y;
        self.last_y = y;

        marker.apply(dom, &self.selection.participants());

        let target = find_drop_target(dom, &self.table, config, self.primary(), y)?;
        self.move_primary(dom, &target, moving_down);
        if self.selection.has_companions() {
            self.regroup_companions(dom);
        }
        Some(target)
    }

    fn move_primary(&self, dom: &mut dyn Dom, target: &str, moving_down: bool) {
        let primary = self.primary();
        let result = if moving_down {
            dom.insert_after(primary, target)
        } else {
            dom.insert_before(primary, Some(target))
        };
        match result {
            Ok(()) => trace!(
                "Moved '{primary}' {} '{target}'",
                if moving_down { "after" } else { "before" }
            ),
            Err(e) => warn!("Could not move '{primary}' next to '{target}': {e}"),
        }
    }

    /// Replay companions in their original order around the primary row so
    /// the selection ends up as one contiguous block.
    fn regroup_companions(&self, dom: &mut dyn Dom) {
        let primary = self.primary();
        let mut insert_target = primary.to_string();

        for companion in &self.selection.companions {
            if companion.row == primary {
                continue;
            }

            if self.selection.goes_before_primary(companion) {
                if let Err(e) = dom.insert_before(&companion.row, Some(primary)) {
                    warn!("Could not place companion '{}': {e}", companion.row);
                }
                continue;
            }

            match dom.insert_after(&companion.row, &insert_target) {
                Ok(()) => insert_target = companion.row.clone(),
                Err(e) => warn!("Could not place companion '{}': {e}", companion.row),
            }
        }

        debug!(
            "Regrouped {} companion(s) around '{primary}'",
            self.selection.companions.len()
        );
    }
}

/// Scroll when the pointer is within `amount` of a viewport edge.
fn auto_scroll(dom: &mut dyn Dom, pointer: Point, amount: i32) {
    if amount <= 0 {
        return;
    }
    let viewport = dom.viewport();
    let relative = pointer.y - viewport.scroll_y;
    if relative < amount {
        dom.scroll_by(0, -amount);
    } else if viewport.height - relative < amount {
        dom.scroll_by(0, amount);
    }
}
