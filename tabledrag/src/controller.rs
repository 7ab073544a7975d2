//! Session lifecycle: binds tables and routes pointer events.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::config::{DragConfig, DragEvent, DropStatus, VisualMarker, NO_DRAG_CLASS};
use crate::dom::{Dom, ElementKind};
use crate::event::{EventResult, MouseButton, PointerEvent};
use crate::geometry::{self, pointer_coordinates};
use crate::selection::Selection;
use crate::session::{DragSession, DragState};
use crate::throttle::MoveThrottle;

#[derive(Debug)]
struct TableBinding {
    config: DragConfig,
    marker: VisualMarker,
    /// Cells that start a drag, mapped to the row they drag.
    handles: HashMap<String, String>,
}

impl TableBinding {
    fn new(dom: &dyn Dom, table: &str, config: DragConfig) -> Self {
        let marker = VisualMarker::resolve(&config);
        let mut binding = Self {
            config,
            marker,
            handles: HashMap::new(),
        };
        binding.rebind(dom, table);
        binding
    }

    fn rebind(&mut self, dom: &dyn Dom, table: &str) {
        self.handles.clear();
        for row in dom.rows(table) {
            let mut cell = dom.first_child(&row);
            while let Some(id) = cell {
                if dom.kind(&id) == Some(ElementKind::Cell) && self.is_handle(dom, &row, &id) {
                    self.handles.insert(id.clone(), row.clone());
                }
                cell = dom.next_sibling(&id);
            }
        }
        debug!("Bound {} drag handle(s) on '{table}'", self.handles.len());
    }

    fn is_handle(&self, dom: &dyn Dom, row: &str, cell: &str) -> bool {
        if dom.has_class(row, NO_DRAG_CLASS) {
            return false;
        }
        match &self.config.drag_handle {
            Some(class) => dom.has_class(cell, class),
            None => true,
        }
    }

    /// Row dragged by a pointer-down on `target`. With a drag handle the press
    /// may land anywhere inside the handle cell; otherwise it must hit a cell.
    fn resolve_row(&self, dom: &dyn Dom, target: &str) -> Option<String> {
        let cell = match self.config.drag_handle {
            Some(_) => dom.closest(target, ElementKind::Cell)?,
            None if dom.kind(target) == Some(ElementKind::Cell) => target.to_string(),
            None => return None,
        };
        self.handles.get(&cell).cloned()
    }
}

/// Drag-and-drop row reordering for a set of tables.
///
/// Owns the single drag session of the process. Every handler runs to
/// completion against the host document passed in, so a `TableDnd` needs no
/// locking; the only reentrancy guard is the in-flight drop flag.
#[derive(Debug, Default)]
pub struct TableDnd {
    tables: HashMap<String, TableBinding>,
    state: DragState,
    drop_in_flight: bool,
    throttle: Option<MoveThrottle>,
}

impl TableDnd {
    pub fn new() -> Self {
        Self::default()
    }

    /// Coalesce pointer-move samples to one per `interval`.
    pub fn with_move_throttle(mut self, interval: Duration) -> Self {
        self.throttle = Some(MoveThrottle::new(interval));
        self
    }

    /// Enable dragging on `tables`. Ids that are not tables are skipped.
    /// Attaching an already attached table replaces its configuration.
    pub fn attach<S: AsRef<str>>(&mut self, dom: &dyn Dom, tables: &[S], config: DragConfig) {
        for table in tables {
            let table = table.as_ref();
            if dom.kind(table) != Some(ElementKind::Table) {
                warn!("Cannot attach drag behaviour to '{table}': not a table");
                continue;
            }
            self.tables
                .insert(table.to_string(), TableBinding::new(dom, table, config.clone()));
        }
    }

    /// Re-scan rows of attached tables, e.g. after rows were added.
    pub fn refresh<S: AsRef<str>>(&mut self, dom: &dyn Dom, tables: &[S]) {
        for table in tables {
            let table = table.as_ref();
            match self.tables.get_mut(table) {
                Some(binding) => binding.rebind(dom, table),
                None => debug!("Refresh skipped for unattached table '{table}'"),
            }
        }
    }

    pub fn is_attached(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    pub fn is_dragging(&self) -> bool {
        self.state.is_dragging()
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.state.session()
    }

    /// Whether a drop hook reported pending work that has not finished yet.
    pub fn drop_in_flight(&self) -> bool {
        self.drop_in_flight
    }

    /// Start a drag when the press lands on a drag handle of an attached table.
    pub fn pointer_down(&mut self, dom: &mut dyn Dom, event: &PointerEvent) -> EventResult {
        if event.button != MouseButton::Left {
            return EventResult::Ignored;
        }
        if let Some(session) = self.state.session() {
            debug!("Pointer down ignored, drag of '{}' still active", session.primary());
            return EventResult::Ignored;
        }
        let Some(target) = event.target.as_deref() else {
            return EventResult::Ignored;
        };
        let Some((table, primary)) = self
            .tables
            .iter()
            .find_map(|(table, binding)| Some((table.clone(), binding.resolve_row(dom, target)?)))
        else {
            return EventResult::Ignored;
        };
        let Some(binding) = self.tables.get(&table) else {
            return EventResult::Ignored;
        };

        let pointer = pointer_coordinates(event, dom.viewport());
        let row_position = geometry::position(dom, &primary);
        let grab_offset = pointer - row_position;
        let selection = Selection::capture(dom, &table, &binding.config, &primary, pointer);

        if let Some(hook) = &binding.config.on_drag_start {
            let companions = selection.companion_rows();
            let drag = DragEvent {
                table: &table,
                primary: &primary,
                companions: &companions,
                dom: &*dom,
            };
            if let Err(e) = hook(&drag) {
                warn!("Drag start hook failed for '{primary}': {e}");
            }
        }

        debug!("Drag started on '{table}' with row '{primary}' (grab offset {grab_offset:?})");
        self.state = DragState::Dragging(DragSession::new(
            table,
            selection,
            grab_offset,
            row_position.y,
        ));
        if let Some(throttle) = &mut self.throttle {
            throttle.reset();
        }
        EventResult::StartDrag
    }

    /// Feed a pointer sample to the active drag.
    pub fn pointer_move(&mut self, dom: &mut dyn Dom, event: &PointerEvent, now: Instant) -> EventResult {
        if !self.state.is_dragging() || self.drop_in_flight {
            return EventResult::Ignored;
        }

        let event = match &mut self.throttle {
            Some(throttle) => match throttle.offer(event.clone(), now) {
                Some(event) => event,
                None => return EventResult::Consumed,
            },
            None => event.clone(),
        };
        self.process_move(dom, &event);
        EventResult::Consumed
    }

    /// Deliver a throttled sample whose window has elapsed. Hosts using a
    /// move throttle call this from their event loop.
    pub fn flush(&mut self, dom: &mut dyn Dom, now: Instant) {
        if !self.state.is_dragging() || self.drop_in_flight {
            return;
        }
        let Some(event) = self.throttle.as_mut().and_then(|throttle| throttle.take_due(now)) else {
            return;
        };
        self.process_move(dom, &event);
    }

    fn process_move(&mut self, dom: &mut dyn Dom, event: &PointerEvent) {
        let pointer = pointer_coordinates(event, dom.viewport());
        let Some(session) = self.state.session_mut() else {
            return;
        };
        let Some(binding) = self.tables.get(session.table()) else {
            return;
        };
        session.on_move(dom, &binding.config, &binding.marker, pointer);
    }

    /// Finish the active drag: release markers, clear the session and run the
    /// drop hook unless another drop is still in flight.
    pub fn pointer_up(&mut self, dom: &mut dyn Dom, _event: &PointerEvent) -> EventResult {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return EventResult::Ignored;
        };
        if let Some(throttle) = &mut self.throttle {
            throttle.reset();
        }

        let Some(binding) = self.tables.get(session.table()) else {
            return EventResult::Consumed;
        };
        binding
            .marker
            .release(dom, &session.selection().participants());

        let Some(hook) = &binding.config.on_drop else {
            debug!("Dropped '{}' on '{}'", session.primary(), session.table());
            return EventResult::Consumed;
        };
        if self.drop_in_flight {
            debug!(
                "Drop hook for '{}' suppressed, previous drop still running",
                session.primary()
            );
            return EventResult::Consumed;
        }

        self.drop_in_flight = true;
        let companions = session.selection().companion_rows();
        let drop = DragEvent {
            table: session.table(),
            primary: session.primary(),
            companions: &companions,
            dom: &*dom,
        };
        match hook(&drop) {
            DropStatus::Done => self.drop_in_flight = false,
            DropStatus::Pending => debug!("Drop hook for '{}' pending", session.primary()),
        }
        EventResult::Consumed
    }

    /// Mark a pending drop as finished. Returns whether one was in flight.
    pub fn finish_drop(&mut self) -> bool {
        std::mem::replace(&mut self.drop_in_flight, false)
    }
}
